pub mod backfill;
pub mod chunking;
pub mod flatten;
pub mod html_clean;
pub mod importer;
pub mod source;

pub use backfill::sync_project_chunks;
pub use flatten::{flatten_project, FlatProject};
pub use importer::Neo4jImporter;
pub use source::SourceRepository;
