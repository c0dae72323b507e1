use crate::context::BuildContext;
use crate::flags;
use crate::toolchain::Toolchain;
use crate::{DriverError, Result};
use gizmo_build::{BuildItem, BuildKind, ObjectItem, ObjectKind};
use gizmo_synth::LineMarkers;
use std::path::{Path, PathBuf};

/// Directory, relative to the project root, that manifest paths resolve in.
pub const SOURCE_DIR: &str = "src";

/// Directory, relative to the project root, receiving all build output.
pub const BUILD_DIR: &str = "build";

/// Build driver that turns manifest items into executables.
///
/// Every call regenerates and recompiles everything; nothing is cached
/// between runs apart from reusing the output directories.
#[derive(Debug, Clone)]
pub struct Driver {
    root: PathBuf,
    toolchain: Toolchain,
}

impl Driver {
    /// Driver for the project rooted at `root`, using the default toolchain.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            toolchain: Toolchain::default(),
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn source_root(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    pub fn build_root(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    /// Build every item in order, stopping at the first failure.
    pub fn build_all(&self, items: &[BuildItem], kind: BuildKind) -> Result<Vec<PathBuf>> {
        items.iter().map(|item| self.build(item, kind)).collect()
    }

    /// Build one item and return the path of its executable.
    pub fn build(&self, item: &BuildItem, kind: BuildKind) -> Result<PathBuf> {
        log::info!("building {} ({})", item.name, kind);
        self.build_item(item, kind).map_err(|e| DriverError::Item {
            name: item.name.clone(),
            source: Box::new(e),
        })
    }

    /// Build every test item in order, stopping at the first failure.
    pub fn test_all(&self, items: &[BuildItem]) -> Result<Vec<PathBuf>> {
        items.iter().map(|item| self.test(item)).collect()
    }

    /// Build the test binary of one item and return its path.
    pub fn test(&self, item: &BuildItem) -> Result<PathBuf> {
        log::info!("building tests {}", item.name);
        self.build_test_item(item).map_err(|e| DriverError::Test {
            name: item.name.clone(),
            source: Box::new(e),
        })
    }

    fn build_item(&self, item: &BuildItem, kind: BuildKind) -> Result<PathBuf> {
        let recipe = item.ordinary_recipe()?;
        let ctx = BuildContext::for_build(&self.build_root(), &item.name, kind);

        create_dir(&ctx.cache_dir)?;
        let objects = self.build_objects(&ctx, &recipe.objects, None)?;

        self.link(&ctx, &item.name, &objects)
    }

    fn build_test_item(&self, item: &BuildItem) -> Result<PathBuf> {
        let recipe = item.test_recipe()?;
        let ctx = BuildContext::for_test(&self.build_root(), &item.name);

        create_dir(&ctx.cache_dir)?;
        let objects = self.build_objects(&ctx, &recipe.objects, Some(recipe.tests.as_slice()))?;

        self.link(&ctx, &item.name, &objects)
    }

    /// Compile `objects` in order, returning their object file paths.
    ///
    /// With `tests` set, the `main` object is replaced by the generated test
    /// harness.
    fn build_objects(
        &self,
        ctx: &BuildContext,
        objects: &[ObjectItem],
        tests: Option<&[String]>,
    ) -> Result<Vec<PathBuf>> {
        let mut list = Vec::with_capacity(objects.len());

        for object in objects {
            let obj_ctx = ctx.with_file_path(ctx.object_path(object));

            let built = match tests {
                Some(tests) if object.is_test_main() => {
                    self.build_test_main_object(&obj_ctx, object, tests)
                }
                _ => self.build_object(&obj_ctx, object),
            };
            built.map_err(|e| DriverError::Object {
                kind: object.kind.clone(),
                name: object.name.clone(),
                source: Box::new(e),
            })?;

            list.push(obj_ctx.file_path);
        }

        Ok(list)
    }

    fn build_object(&self, ctx: &BuildContext, object: &ObjectItem) -> Result<()> {
        match object.validate()? {
            ObjectKind::Cpp => self.build_cpp_object(ctx, object),
            ObjectKind::Asm => self.build_asm_object(ctx, object),
        }
    }

    fn build_cpp_object(&self, ctx: &BuildContext, object: &ObjectItem) -> Result<()> {
        let unit_path = ctx.unit_path(object);
        let unit = gizmo_synth::merge_fragments(
            &self.source_root(),
            &object.parts,
            &object.ext_headers,
            LineMarkers::Reset,
        )?;
        gizmo_synth::write_unit(&unit_path, &unit)?;

        self.toolchain
            .compile(&flags::compile_args(ctx.kind, &unit_path, &ctx.file_path))
    }

    fn build_asm_object(&self, ctx: &BuildContext, object: &ObjectItem) -> Result<()> {
        let source_root = self.source_root();
        let sources: Vec<PathBuf> = object.parts.iter().map(|p| source_root.join(p)).collect();

        self.toolchain
            .assemble(&flags::assemble_args(&sources, &ctx.file_path))
    }

    fn build_test_main_object(
        &self,
        ctx: &BuildContext,
        object: &ObjectItem,
        tests: &[String],
    ) -> Result<()> {
        object.validate()?;

        let unit_path = ctx.unit_path(object);
        let unit = gizmo_synth::build_test_main_unit(
            &self.source_root(),
            &object.parts,
            &object.ext_headers,
            tests,
        )?;
        log::info!("generated harness with {} tests", unit.tests.len());
        gizmo_synth::write_unit(&unit_path, &unit.contents)?;

        self.toolchain
            .compile(&flags::compile_args(ctx.kind, &unit_path, &ctx.file_path))
    }

    fn link(&self, ctx: &BuildContext, item: &str, objects: &[PathBuf]) -> Result<PathBuf> {
        create_dir(&ctx.bin_dir)?;

        let link_ctx = ctx.with_file_path(ctx.binary_path(item));
        self.toolchain
            .link(&flags::link_args(link_ctx.kind, objects, &link_ctx.file_path))?;

        log::info!("linked {}", link_ctx.file_path.display());
        Ok(link_ctx.file_path)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| DriverError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
