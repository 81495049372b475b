//! One persistable type per shape, shared by the tests.

use serde::{Deserialize, Serialize};
use shelf_codec::{JsonCodec, NoMetadata, ObjectCodec, Storable, ValueCodec};
use shelf_types::Persistable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision(pub u32);

/// Object payload, no metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub body: String,
}

impl Note {
    pub fn new(id: &str, body: &str) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

impl Persistable for Note {
    const COLLECTION: &'static str = "notes";

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Storable for Note {
    type Codec = ObjectCodec;
    type Metadata = ();
    type MetadataCodec = NoMetadata;
}

/// Object payload, object metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub flags: Option<Flags>,
}

impl Task {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            flags: None,
        }
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = Some(flags);
        self
    }
}

impl Persistable for Task {
    const COLLECTION: &'static str = "tasks";

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Storable for Task {
    type Codec = ObjectCodec;
    type Metadata = Flags;
    type MetadataCodec = ObjectCodec;

    fn metadata(&self) -> Option<&Flags> {
        self.flags.as_ref()
    }

    fn set_metadata(&mut self, metadata: Option<Flags>) {
        self.flags = metadata;
    }
}

/// Object payload, value metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: String,
    pub text: String,
    pub revision: Option<Revision>,
}

impl Draft {
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = Some(revision);
        self
    }
}

impl Persistable for Draft {
    const COLLECTION: &'static str = "drafts";

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Storable for Draft {
    type Codec = ObjectCodec;
    type Metadata = Revision;
    type MetadataCodec = ValueCodec;

    fn metadata(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    fn set_metadata(&mut self, metadata: Option<Revision>) {
        self.revision = metadata;
    }
}

/// Value payload, no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
    pub code: u64,
}

impl Barcode {
    pub fn new(code: u64) -> Self {
        Self { code }
    }
}

impl Persistable for Barcode {
    const COLLECTION: &'static str = "barcodes";

    fn key(&self) -> String {
        self.code.to_string()
    }
}

impl Storable for Barcode {
    type Codec = ValueCodec;
    type Metadata = ();
    type MetadataCodec = NoMetadata;
}

/// Value payload, object metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub price_cents: u64,
    #[serde(skip)]
    pub flags: Option<Flags>,
}

impl Product {
    pub fn new(sku: &str, price_cents: u64) -> Self {
        Self {
            sku: sku.into(),
            price_cents,
            flags: None,
        }
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = Some(flags);
        self
    }
}

impl Persistable for Product {
    const COLLECTION: &'static str = "products";

    fn key(&self) -> String {
        self.sku.clone()
    }
}

impl Storable for Product {
    type Codec = ValueCodec;
    type Metadata = Flags;
    type MetadataCodec = ObjectCodec;

    fn metadata(&self) -> Option<&Flags> {
        self.flags.as_ref()
    }

    fn set_metadata(&mut self, metadata: Option<Flags>) {
        self.flags = metadata;
    }
}

/// Value payload, value metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    pub revision: Option<Revision>,
}

impl Contact {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = Some(revision);
        self
    }
}

impl Persistable for Contact {
    const COLLECTION: &'static str = "contacts";

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Storable for Contact {
    type Codec = JsonCodec;
    type Metadata = Revision;
    type MetadataCodec = ValueCodec;

    fn metadata(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    fn set_metadata(&mut self, metadata: Option<Revision>) {
        self.revision = metadata;
    }
}
