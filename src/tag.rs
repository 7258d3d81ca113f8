//! Tags discovered by an adapter

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tagcodec_util::{encoding::base64_encode, format::spaced_hex};

use crate::{
    error::{DecodeError, Result},
    fields::{FieldReader, Object, Strict},
};

pub const TAG_KIND: &str = "Tag";

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    #[default]
    Unknown,
    Nfc,
    Barcode,
    Bluetooth,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub tag_id: String,
    pub type_: TagType,
    pub adapter_id: String,
    pub adapter_name: String,
    pub uid: Vec<u8>,
    pub atr: Vec<u8>,
    pub product: String,
    pub vendor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagResource {
    pub tag_id: String,
    pub kind: String,
    pub href: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub adapter_id: String,
    pub adapter_name: String,
    pub uid: String,
    pub atr: String,
    pub product: String,
    pub vendor: String,
}

impl Tag {
    pub fn href(&self) -> String {
        format!("/adapters/{}/tags/{}", self.adapter_id, self.tag_id)
    }
}

impl From<&Tag> for TagResource {
    fn from(tag: &Tag) -> Self {
        Self {
            tag_id: tag.tag_id.clone(),
            kind: TAG_KIND.to_string(),
            href: tag.href(),
            type_: tag.type_.to_string(),
            adapter_id: tag.adapter_id.clone(),
            adapter_name: tag.adapter_name.clone(),
            uid: base64_encode(&tag.uid),
            atr: base64_encode(&tag.atr),
            product: tag.product.clone(),
            vendor: tag.vendor.clone(),
        }
    }
}

pub fn tag_to_value(tag: &Tag) -> Value {
    serde_json::to_value(TagResource::from(tag)).unwrap_or_default()
}

pub fn tag_from_value(value: &Value) -> Result<Tag> {
    let object = Strict.element(value, "tag")?.ok_or_else(|| DecodeError::missing("tag"))?;
    read_tag(&mut Strict, object)
}

/// Unknown tag types read as [`TagType::Unknown`], `kind` and `href` are ignored
pub(crate) fn read_tag<R: FieldReader>(reader: &mut R, object: &Object) -> Result<Tag, R::Error> {
    let type_ = reader.string(object, "type")?;

    Ok(Tag {
        tag_id: reader.string(object, "tag_id")?,
        type_: type_.parse().unwrap_or_default(),
        adapter_id: reader.string(object, "adapter_id")?,
        adapter_name: reader.string(object, "adapter_name")?,
        uid: reader.string_base64(object, "uid")?,
        atr: reader.string_base64(object, "atr")?,
        product: reader.string(object, "product")?,
        vendor: reader.string(object, "vendor")?,
    })
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UID: {}\nATR: {}\nProduct: {}\nVendor: {}",
            spaced_hex(&self.uid),
            spaced_hex(&self.atr),
            self.product,
            self.vendor
        )
    }
}
