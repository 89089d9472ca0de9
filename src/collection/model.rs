use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::RequestDescriptor;

pub const POSTMAN_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";
const DESCRIPTION: &str = "Generated by dex";

/// Postman v2.1 collection document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub info: CollectionInfo,
    pub item: Vec<CollectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "_postman_id")]
    pub id: Uuid,
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub name: String,
    pub request: ItemRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub method: String,
    pub header: Vec<KeyValue>,
    pub url: ItemUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUrl {
    pub raw: String,
    pub protocol: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
    pub query: Vec<KeyValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl Collection {
    pub fn new<'a, I>(name: impl Into<String>, descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a RequestDescriptor>,
    {
        Self {
            info: CollectionInfo {
                name: name.into(),
                description: DESCRIPTION.to_string(),
                id: Uuid::new_v4(),
                schema: POSTMAN_SCHEMA.to_string(),
            },
            item: descriptors.into_iter().map(CollectionItem::from).collect(),
        }
    }

    pub fn for_status(status: u16) -> String {
        format!("Status Code {status} Collection")
    }
}

impl From<&RequestDescriptor> for CollectionItem {
    fn from(descriptor: &RequestDescriptor) -> Self {
        let full_url = descriptor.full_url();
        Self {
            name: full_url.clone(),
            request: ItemRequest {
                method: descriptor.method().to_string(),
                header: descriptor
                    .headers()
                    .iter()
                    .map(|(key, value)| KeyValue {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect(),
                url: ItemUrl {
                    raw: full_url,
                    protocol: descriptor.scheme().to_string(),
                    host: vec![descriptor.host().to_string()],
                    path: descriptor.path_segments(),
                    query: descriptor
                        .query_pairs()
                        .into_iter()
                        .map(|(key, value)| KeyValue { key, value })
                        .collect(),
                },
            },
        }
    }
}
