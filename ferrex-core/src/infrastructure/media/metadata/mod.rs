mod filename_parser;
mod hdr_metadata;
mod metadata_extractor;
mod technical_metadata;

pub use filename_parser::FilenameParser;
pub use metadata_extractor::MetadataExtractor;
