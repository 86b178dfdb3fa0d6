//! WGSL front end for the wgpu backend.
//!
//! Parses and validates a vertex/fragment source pair with naga and extracts
//! what an immediate-mode program exposes: named vertex inputs and named
//! members of the uniform block at `@group(0) @binding(0)`.
//!
//! The two stages are also linked: vertex inputs must be f32 scalars or
//! vectors, and every fragment `@location` input must be written by the
//! vertex stage with the same type.
//!
//! Resource bindings follow one fixed layout so every program shares the same
//! bind group shape: group 0, binding 0 uniform block, binding 1 2D float
//! texture, binding 2 filtering sampler.

use std::collections::HashMap;

/// One member of the uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct UniformField {
    pub offset: u32,
    pub size: u32,
}

/// Reflected interface of a program.
#[derive(Debug, Clone)]
pub(crate) struct ProgramReflection {
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// Vertex input name -> `@location`.
    pub attributes: HashMap<String, u32>,
    /// Uniform block member name -> byte range.
    pub uniforms: HashMap<String, UniformField>,
    /// Size in bytes of the uniform block (0 when there is none).
    pub uniform_block_size: u32,
}

/// Compiles both stages and reflects their combined interface.
///
/// Errors carry naga's rendered diagnostic.
pub(crate) fn reflect_program(
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ProgramReflection, String> {
    let vertex = compile("vertex", vertex_source)?;
    let fragment = compile("fragment", fragment_source)?;

    check_bindings(&vertex, "vertex")?;
    check_bindings(&fragment, "fragment")?;

    let vertex_ep = single_entry_point(&vertex, naga::ShaderStage::Vertex, "vertex")?;
    let fragment_ep = single_entry_point(&fragment, naga::ShaderStage::Fragment, "fragment")?;

    let inputs = stage_inputs(&vertex, vertex_ep);
    for input in &inputs {
        if !is_float_attribute(&input.ty) {
            return Err(format!(
                "vertex input `{}` at @location({}) is {}; attributes are fed as f32 scalars or vectors",
                input.name,
                input.location,
                describe(&input.ty)
            ));
        }
    }
    link(&stage_outputs(&vertex, vertex_ep), &stage_inputs(&fragment, fragment_ep))?;

    let attributes = inputs
        .into_iter()
        .map(|input| (input.name, input.location))
        .collect();

    let mut uniforms: HashMap<String, UniformField> = HashMap::new();
    let mut uniform_block_size = 0;
    for (stage, module) in [("vertex", &vertex), ("fragment", &fragment)] {
        let Some((fields, span)) = uniform_block(module) else { continue };
        uniform_block_size = uniform_block_size.max(span);
        for (name, field) in fields {
            match uniforms.get(&name) {
                Some(existing) if *existing != field => {
                    return Err(format!(
                        "uniform `{name}` is laid out at offset {} in one stage but at {} in the {stage} stage",
                        existing.offset, field.offset
                    ));
                }
                Some(_) => {}
                None => {
                    uniforms.insert(name, field);
                }
            }
        }
    }

    Ok(ProgramReflection {
        vertex_entry: vertex_ep.name.clone(),
        fragment_entry: fragment_ep.name.clone(),
        attributes,
        uniforms,
        uniform_block_size,
    })
}

fn compile(stage: &str, source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| format!("{stage} stage: {}", e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| format!("{stage} stage: {}", e.emit_to_string(source)))?;

    Ok(module)
}

fn check_bindings(module: &naga::Module, stage: &str) -> Result<(), String> {
    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");
        let inner = &module.types[var.ty].inner;
        let ok = binding.group == 0
            && match binding.binding {
                0 => var.space == naga::AddressSpace::Uniform,
                1 => matches!(
                    inner,
                    naga::TypeInner::Image {
                        dim: naga::ImageDimension::D2,
                        arrayed: false,
                        class: naga::ImageClass::Sampled {
                            kind: naga::ScalarKind::Float,
                            multi: false
                        },
                    }
                ),
                2 => matches!(inner, naga::TypeInner::Sampler { comparison: false }),
                _ => false,
            };
        if !ok {
            return Err(format!(
                "{stage} stage: `{name}` at @group({}) @binding({}) does not fit the uniform/texture/sampler layout",
                binding.group, binding.binding
            ));
        }
    }
    Ok(())
}

fn single_entry_point<'m>(
    module: &'m naga::Module,
    stage: naga::ShaderStage,
    label: &str,
) -> Result<&'m naga::EntryPoint, String> {
    let mut candidates = module.entry_points.iter().filter(|ep| ep.stage == stage);
    match (candidates.next(), candidates.next()) {
        (Some(ep), None) => Ok(ep),
        (None, _) => Err(format!("{label} source has no @{label} entry point")),
        (Some(_), Some(_)) => Err(format!("{label} source has more than one @{label} entry point")),
    }
}

/// A user-defined `@location` on a stage boundary.
struct Located {
    location: u32,
    name: String,
    ty: naga::TypeInner,
}

fn stage_inputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<Located> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect_locations(module, arg.binding.as_ref(), arg.ty, arg.name.as_deref(), &mut out);
    }
    out
}

fn stage_outputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<Located> {
    let mut out = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_locations(module, result.binding.as_ref(), result.ty, None, &mut out);
    }
    out
}

// Inputs and outputs may also be grouped in a struct.
fn collect_locations(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    name: Option<&str>,
    out: &mut Vec<Located>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(Located {
            location: *location,
            name: name.unwrap_or("<unnamed>").to_owned(),
            ty: inner.clone(),
        }),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = inner {
                for m in members {
                    collect_locations(module, m.binding.as_ref(), m.ty, m.name.as_deref(), out);
                }
            }
        }
    }
}

fn is_float_attribute(ty: &naga::TypeInner) -> bool {
    match ty {
        naga::TypeInner::Scalar(s) | naga::TypeInner::Vector { scalar: s, .. } => {
            *s == naga::Scalar::F32
        }
        _ => false,
    }
}

/// Every fragment input must be written by the vertex stage with the same type.
fn link(vertex_outputs: &[Located], fragment_inputs: &[Located]) -> Result<(), String> {
    for input in fragment_inputs {
        let Some(output) = vertex_outputs.iter().find(|o| o.location == input.location) else {
            return Err(format!(
                "fragment input `{}` at @location({}) is not written by the vertex stage",
                input.name, input.location
            ));
        };
        if output.ty != input.ty {
            return Err(format!(
                "fragment input `{}` at @location({}) is {} but the vertex stage writes {}",
                input.name,
                input.location,
                describe(&input.ty),
                describe(&output.ty)
            ));
        }
    }
    Ok(())
}

fn describe(ty: &naga::TypeInner) -> String {
    let scalar = |s: &naga::Scalar| match (s.kind, s.width) {
        (naga::ScalarKind::Float, 4) => "f32".to_owned(),
        (naga::ScalarKind::Sint, 4) => "i32".to_owned(),
        (naga::ScalarKind::Uint, 4) => "u32".to_owned(),
        (kind, width) => format!("{kind:?}{}", u32::from(width) * 8),
    };
    match ty {
        naga::TypeInner::Scalar(s) => scalar(s),
        naga::TypeInner::Vector { size, scalar: s } => format!("vec{}<{}>", *size as u8, scalar(s)),
        other => format!("{other:?}"),
    }
}

fn uniform_block(module: &naga::Module) -> Option<(Vec<(String, UniformField)>, u32)> {
    module.global_variables.iter().find_map(|(_, var)| {
        let binding = var.binding.as_ref()?;
        if var.space != naga::AddressSpace::Uniform || binding.group != 0 || binding.binding != 0 {
            return None;
        }
        let naga::TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
            return None;
        };
        let fields = members
            .iter()
            .filter_map(|m| {
                let name = m.name.clone()?;
                let size = module.types[m.ty].inner.size(module.to_ctx());
                Some((name, UniformField { offset: m.offset, size }))
            })
            .collect();
        Some((fields, *span))
    })
}
