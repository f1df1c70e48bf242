use crate::AssetError;
use std::fmt;
use std::path::Path;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point name expected in the WGSL source.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// WGSL text for one stage, labelled with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub label: String,
    pub code: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            stage,
            label: label.into(),
            code: code.into(),
        }
    }

    /// Read a WGSL file for `stage`.
    pub fn load(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|source| AssetError::ShaderNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("read {stage} shader {} ({} bytes)", path.display(), code.len());
        Ok(Self::new(stage, path.display().to_string(), code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_file_and_labels_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vertex.wgsl");
        std::fs::write(&path, "@vertex fn vs_main() {}").unwrap();

        let src = ShaderSource::load(ShaderStage::Vertex, &path).unwrap();
        assert_eq!(src.stage, ShaderStage::Vertex);
        assert!(src.code.contains("vs_main"));
        assert!(src.label.ends_with("vertex.wgsl"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = ShaderSource::load(ShaderStage::Fragment, "/no/fragment.wgsl").unwrap_err();
        assert!(matches!(err, AssetError::ShaderNotFound { .. }));
        assert!(err.to_string().contains("fragment.wgsl"));
    }

    #[test]
    fn stage_entry_points() {
        assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
