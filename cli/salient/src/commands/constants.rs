//! `salient constants`: generate the constants module.

use std::path::Path;

use anyhow::Result;
use salient_consts::{render_json, render_module};

use super::{constant_table, write_output};
use crate::manifest::SalientManifest;

pub fn run(project_dir: &Path, manifest: &SalientManifest, json: bool, output: Option<&Path>) -> Result<()> {
    let table = constant_table(project_dir, manifest)?;
    tracing::info!(constants = table.len(), "collected constants");
    let text = if json { render_json(&table)? + "\n" } else { render_module(&table) };
    write_output(output, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::HeadersConfig;

    fn project() -> (tempfile::TempDir, SalientManifest) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("include")).unwrap();
        std::fs::write(
            dir.path().join("include/keys.h"),
            "#define SALIENT_MAJOR_VERSION 2\n#define SALIENT_KEY_DOWN 80\n#define SALIENT_KEY_UP 72\n\
             #define SALIENT_E_OK 0\nint salient_init(void);\n",
        )
        .unwrap();
        let manifest = SalientManifest {
            headers: HeadersConfig {
                paths: vec!["include".into()],
                ..HeadersConfig::default()
            },
            ..SalientManifest::default()
        };
        (dir, manifest)
    }

    #[test]
    fn module_output() {
        let (dir, manifest) = project();
        let out = dir.path().join("constants.py");
        run(dir.path(), &manifest, false, Some(&out)).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("SALIENT_KEY_UP = 72\nSALIENT_KEY_DOWN = 80\n"));
        assert!(!text.contains("SALIENT_MAJOR_VERSION"));
        assert!(!text.contains("SALIENT_E_OK"));
    }

    #[test]
    fn json_output() {
        let (dir, manifest) = project();
        let out = dir.path().join("constants.json");
        run(dir.path(), &manifest, true, Some(&out)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let constants = value["constants"].as_array().unwrap();
        assert_eq!(constants.len(), 2);
        assert_eq!(constants[0]["name"], "SALIENT_KEY_UP");
    }
}
