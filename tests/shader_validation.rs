use std::collections::BTreeMap;

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, ImageDimension, ScalarKind, ShaderStage, TypeInner};
use tile_wall::transform::{
    build_shader_source, TransformUniform, FRAGMENT_ENTRY, INDEX_ENTRY, VERTEX_ENTRY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ResourceKind {
    Uniform,
    Texture2d,
    Sampler,
}

fn parse_and_validate(source: &str) -> (naga::Module, naga::valid::ModuleInfo) {
    let module = wgsl::parse_str(source).unwrap_or_else(|err| {
        panic!("tile_wall WGSL parse failed: {}", err.emit_to_string(source));
    });
    let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .unwrap_or_else(|err| panic!("tile_wall WGSL validation failed: {err:?}"));
    (module, info)
}

fn entry_point<'a>(module: &'a naga::Module, stage: ShaderStage, name: &str) -> &'a naga::EntryPoint {
    module
        .entry_points
        .iter()
        .find(|entry| entry.stage == stage && entry.name == name)
        .unwrap_or_else(|| panic!("missing entry point {stage:?}:{name}"))
}

fn resource_bindings(module: &naga::Module) -> BTreeMap<(u32, u32), ResourceKind> {
    let mut bindings = BTreeMap::new();
    for (_, global) in module.global_variables.iter() {
        let Some(binding) = &global.binding else {
            continue;
        };
        let kind = match global.space {
            AddressSpace::Uniform => ResourceKind::Uniform,
            AddressSpace::Handle => match &module.types[global.ty].inner {
                TypeInner::Image { dim: ImageDimension::D2, .. } => ResourceKind::Texture2d,
                TypeInner::Sampler { .. } => ResourceKind::Sampler,
                other => panic!("unexpected handle type for binding {binding:?}: {other:?}"),
            },
            other => panic!("unexpected address space for binding {binding:?}: {other:?}"),
        };
        if bindings.insert((binding.group, binding.binding), kind).is_some() {
            panic!("duplicate binding for group {} binding {}", binding.group, binding.binding);
        }
    }
    bindings
}

#[test]
fn tile_wall_shader_validates() {
    let source = build_shader_source();
    let (module, _info) = parse_and_validate(&source);

    entry_point(&module, ShaderStage::Vertex, VERTEX_ENTRY);
    let fragment = entry_point(&module, ShaderStage::Fragment, FRAGMENT_ENTRY);

    let output = fragment
        .function
        .result
        .as_ref()
        .expect("fragment entry point returns a color");
    assert!(matches!(
        output.binding,
        Some(Binding::Location { location: 0, .. })
    ));
}

#[test]
fn index_entry_writes_one_u32_per_pixel() {
    let source = build_shader_source();
    let (module, _info) = parse_and_validate(&source);

    let index = entry_point(&module, ShaderStage::Fragment, INDEX_ENTRY);
    let output = index
        .function
        .result
        .as_ref()
        .expect("index entry point returns a value");
    assert!(matches!(
        output.binding,
        Some(Binding::Location { location: 0, .. })
    ));
    match &module.types[output.ty].inner {
        TypeInner::Scalar(scalar) => {
            assert_eq!(scalar.kind, ScalarKind::Uint);
            assert_eq!(scalar.width, 4);
        }
        other => panic!("index output is not a scalar: {other:?}"),
    }

    // Both fragment entry points go through the one WGSL resolve_tile
    assert_eq!(source.matches("resolve_tile(in.uv)").count(), 2);
}

#[test]
fn tile_wall_shader_bindings_match_pipeline_layout() {
    let (module, _info) = parse_and_validate(&build_shader_source());

    let expected: BTreeMap<(u32, u32), ResourceKind> = [
        ((0, 0), ResourceKind::Uniform),
        ((0, 1), ResourceKind::Texture2d),
        ((0, 2), ResourceKind::Sampler),
    ]
    .into_iter()
    .collect();
    assert_eq!(resource_bindings(&module), expected);
}

#[test]
fn tile_wall_uniform_struct_matches_rust_layout() {
    let (module, _info) = parse_and_validate(&build_shader_source());

    let uniform = module
        .global_variables
        .iter()
        .map(|(_, global)| global)
        .find(|global| global.space == AddressSpace::Uniform)
        .expect("uniform binding present");

    match &module.types[uniform.ty].inner {
        TypeInner::Struct { members, span } => {
            assert_eq!(*span as usize, std::mem::size_of::<TransformUniform>());
            let names: Vec<_> = members.iter().filter_map(|m| m.name.as_deref()).collect();
            let expected: Vec<_> = tile_wall::transform::TRANSFORM_UNIFORM_FIELDS
                .iter()
                .map(|(name, _)| *name)
                .collect();
            assert_eq!(names, expected);

            // gap_fill, offset, repeat, then the scalars, packed with no padding
            let offsets: Vec<u32> = members.iter().map(|m| m.offset).collect();
            assert_eq!(offsets, vec![0, 16, 24, 32, 36, 40, 44, 48, 52, 56, 60]);
        }
        other => panic!("uniform is not a struct: {other:?}"),
    }
}
