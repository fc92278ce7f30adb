pub mod intent;
pub mod processor;
pub mod sanitizer;
pub mod synthesizer;

pub use intent::IntentClassifier;
pub use processor::QueryProcessor;
pub use synthesizer::QuerySynthesizer;
