//! Workspace objects
//!
//! Tabs own an ordered list of block ids; blocks carry a free-form meta map
//! whose `view` key selects the block's content kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::oref::{make_oref, ORef};

pub type MetaMap = BTreeMap<String, Value>;

/// Meta key holding a block's view discriminator (`term`, `web`, ...).
pub const META_VIEW: &str = "view";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub oid: String,
    pub name: String,
    /// Blocks in layout order
    #[serde(default)]
    pub blockids: Vec<String>,
    #[serde(default)]
    pub meta: MetaMap,
}

impl Tab {
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            blockids: Vec::new(),
            meta: MetaMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blockids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub oid: String,
    /// Oref string of the owning tab
    pub parentoref: String,
    #[serde(default)]
    pub meta: MetaMap,
}

impl Block {
    pub fn view(&self) -> Option<&str> {
        self.meta.get(META_VIEW).and_then(Value::as_str)
    }
}

/// Creation request for a new block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    #[serde(default)]
    pub meta: MetaMap,
}

impl BlockDef {
    pub fn with_view(view: &str) -> Self {
        let mut meta = MetaMap::new();
        meta.insert(META_VIEW.to_string(), Value::String(view.to_string()));
        Self { meta }
    }

    pub fn view(&self) -> Option<&str> {
        self.meta.get(META_VIEW).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "otype", rename_all = "lowercase")]
pub enum WaveObj {
    Tab(Tab),
    Block(Block),
}

impl WaveObj {
    pub fn oref(&self) -> ORef {
        match self {
            WaveObj::Tab(tab) => tab.oref(),
            WaveObj::Block(block) => block.oref(),
        }
    }
}

/// A concrete object kind that can live in the store.
pub trait WaveObject: Clone + Send + Sync + 'static {
    const OTYPE: &'static str;

    fn oid(&self) -> &str;
    fn from_obj(obj: &WaveObj) -> Option<Self>;
    fn into_obj(self) -> WaveObj;

    fn oref(&self) -> ORef {
        make_oref(Self::OTYPE, self.oid())
    }
}

impl WaveObject for Tab {
    const OTYPE: &'static str = "tab";

    fn oid(&self) -> &str {
        &self.oid
    }

    fn from_obj(obj: &WaveObj) -> Option<Self> {
        match obj {
            WaveObj::Tab(tab) => Some(tab.clone()),
            _ => None,
        }
    }

    fn into_obj(self) -> WaveObj {
        WaveObj::Tab(self)
    }
}

impl WaveObject for Block {
    const OTYPE: &'static str = "block";

    fn oid(&self) -> &str {
        &self.oid
    }

    fn from_obj(obj: &WaveObj) -> Option<Self> {
        match obj {
            WaveObj::Block(block) => Some(block.clone()),
            _ => None,
        }
    }

    fn into_obj(self) -> WaveObj {
        WaveObj::Block(self)
    }
}
