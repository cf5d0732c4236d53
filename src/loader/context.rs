use crate::{
    asset::ImportedAsset,
    document::Document,
    engine::{Engine, NameManager},
    material_provider::MaterialProvider,
};

/// What every step of an import works with. Lives exactly as long as one import.
pub(crate) struct ImportContext<'a> {
    pub engine: &'a mut dyn Engine,
    pub materials: &'a mut dyn MaterialProvider,
    pub names: Option<&'a mut dyn NameManager>,
    pub document: &'a Document,
    pub asset: &'a mut ImportedAsset,
    pub diagnostics: bool,
}
