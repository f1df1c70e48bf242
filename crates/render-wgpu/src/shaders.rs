use crate::RenderError;
use std::borrow::Cow;
use walksim_assets::{ShaderSource, ShaderStage};

/// Built-in vertex stage, used when no vertex shader path is configured.
pub const DEFAULT_VERTEX_SHADER: &str = include_str!("../../../assets/shaders/vertex.wgsl");

/// Built-in fragment stage, used when no fragment shader path is configured.
pub const DEFAULT_FRAGMENT_SHADER: &str = include_str!("../../../assets/shaders/fragment.wgsl");

/// The configured source for `stage`, or the built-in one.
pub(crate) fn source_or_default(source: Option<&ShaderSource>, stage: ShaderStage) -> ShaderSource {
    match source {
        Some(s) => s.clone(),
        None => {
            let code = match stage {
                ShaderStage::Vertex => DEFAULT_VERTEX_SHADER,
                ShaderStage::Fragment => DEFAULT_FRAGMENT_SHADER,
            };
            ShaderSource::new(stage, format!("built-in {stage}"), code)
        }
    }
}

/// Compile one stage into a shader module.
///
/// Creation runs inside a validation error scope so a broken shader comes
/// back as [`RenderError::ShaderCompile`] carrying the compiler log.
pub(crate) fn compile(
    device: &wgpu::Device,
    source: &ShaderSource,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(source.label.as_str()),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source.code.as_str())),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::ShaderCompile {
            stage: source.stage,
            label: source.label.clone(),
            message: err.to_string(),
        });
    }

    let info = pollster::block_on(module.get_compilation_info());
    for msg in &info.messages {
        match msg.message_type {
            wgpu::CompilationMessageType::Error => {
                return Err(RenderError::ShaderCompile {
                    stage: source.stage,
                    label: source.label.clone(),
                    message: msg.message.clone(),
                });
            }
            wgpu::CompilationMessageType::Warning => {
                tracing::warn!("{}: {}", source.label, msg.message);
            }
            wgpu::CompilationMessageType::Info => {
                tracing::debug!("{}: {}", source.label, msg.message);
            }
        }
    }

    tracing::debug!("compiled {} shader '{}'", source.stage, source.label);
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(code).expect("WGSL parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .expect("WGSL validates");
        module
    }

    fn has_entry(module: &naga::Module, name: &str, stage: naga::ShaderStage) -> bool {
        module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage)
    }

    #[test]
    fn default_vertex_shader_is_valid() {
        let module = parse(DEFAULT_VERTEX_SHADER);
        assert!(has_entry(
            &module,
            ShaderStage::Vertex.entry_point(),
            naga::ShaderStage::Vertex
        ));
    }

    #[test]
    fn default_fragment_shader_is_valid() {
        let module = parse(DEFAULT_FRAGMENT_SHADER);
        assert!(has_entry(
            &module,
            ShaderStage::Fragment.entry_point(),
            naga::ShaderStage::Fragment
        ));
    }

    #[test]
    fn fallback_is_labelled_built_in() {
        let src = source_or_default(None, ShaderStage::Fragment);
        assert_eq!(src.label, "built-in fragment");
        assert_eq!(src.code, DEFAULT_FRAGMENT_SHADER);
    }

    #[test]
    fn configured_source_wins() {
        let custom = ShaderSource::new(ShaderStage::Vertex, "custom", "// custom");
        let src = source_or_default(Some(&custom), ShaderStage::Vertex);
        assert_eq!(src, custom);
    }
}
