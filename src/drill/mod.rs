//! Drill domain: handicaps, the drill schema, prompts and the generation loop.

pub mod corpus;
pub mod generator;
pub mod handicap;
pub mod hint;
pub mod prompts;
pub mod request;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use corpus::{CorpusExample, validate_corpus, validate_examples};
pub use generator::{Generation, ValidatingGenerator};
pub use handicap::{HandicapBand, ParsedHandicap, parse_handicap};
pub use hint::RetryHintBuilder;
pub use prompts::{DrillPromptBuilder, FixedSeed, RandomSeed, VariationSeed};
pub use request::{DrillRequest, MeasurementMethod, PracticeArea};
pub use schema::{
    Condition, Drill, DrillBase, DrillKind, DrillType, Outcome, ShotArea, Station,
    ValidationFailure, validate,
};
