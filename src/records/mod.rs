mod reader;

pub use reader::{read_descriptors, read_records, write_records, RequestRecord, HEADER};
