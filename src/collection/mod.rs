mod group;
mod model;
mod writer;

pub use group::{group_by_status, StatusGroup};
pub use model::{
    Collection, CollectionInfo, CollectionItem, ItemRequest, ItemUrl, KeyValue, POSTMAN_SCHEMA,
};
pub use writer::{collection_file_name, CollectionExporter, MANIFEST_FILE};
