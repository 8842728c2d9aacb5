use serde::{Deserialize, Serialize};

/// A variability feature of the product line.
/// Its name and description are the text of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Feature {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Word extraction contract
/// Returns the tokens of an element, in order. Case is left untouched;
/// the engine lower-cases before comparing.
pub trait WordSource {
    fn words(&self) -> Vec<String>;
}

impl WordSource for Vec<String> {
    fn words(&self) -> Vec<String> {
        self.clone()
    }
}

impl WordSource for Vec<&str> {
    fn words(&self) -> Vec<String> {
        self.iter().map(|w| w.to_string()).collect()
    }
}

/// Read-only access to the block/element partition produced by comparing variants.
/// Blocks are addressed by their position, which must be stable for a run.
pub trait AdaptedModel: Sync {
    type Element: WordSource + Sync;

    fn block_count(&self) -> usize;

    /// Display name, used for status messages only
    fn block_name(&self, block: usize) -> String;

    /// Elements of a block, in a stable order
    fn elements_of_block(&self, block: usize) -> &[Self::Element];
}

/// A block held in memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block<E> {
    pub name: String,
    pub elements: Vec<E>,
}

impl<E> Block<E> {
    pub fn new(name: impl Into<String>, elements: Vec<E>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }
}

/// Simple owned implementation of `AdaptedModel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockModel<E> {
    pub blocks: Vec<Block<E>>,
}

impl<E> BlockModel<E> {
    pub fn new(blocks: Vec<Block<E>>) -> Self {
        Self { blocks }
    }
}

impl<E> AdaptedModel for BlockModel<E>
where
    E: WordSource + Sync,
{
    type Element = E;

    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block_name(&self, block: usize) -> String {
        self.blocks
            .get(block)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| format!("block {block}"))
    }

    fn elements_of_block(&self, block: usize) -> &[E] {
        self.blocks
            .get(block)
            .map(|b| b.elements.as_slice())
            .unwrap_or(&[])
    }
}
