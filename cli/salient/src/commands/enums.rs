//! `salient enums`: generate enum classes from constant prefixes.

use std::path::Path;

use anyhow::{bail, Result};
use salient_consts::{render_enum_class, ConstantTable};

use super::{constant_table, write_output};
use crate::manifest::SalientManifest;

pub fn run(project_dir: &Path, manifest: &SalientManifest, groups: &[String], output: Option<&Path>) -> Result<()> {
    let groups = enum_groups(manifest, groups)?;
    let table = constant_table(project_dir, manifest)?;
    write_output(output, &render(&table, &groups))
}

/// `(class name, prefix)` pairs from the command line, or the manifest.
fn enum_groups(manifest: &SalientManifest, args: &[String]) -> Result<Vec<(String, String)>> {
    if args.is_empty() {
        if manifest.constants.enum_prefixes.is_empty() {
            bail!("no enum groups given; pass NAME=PREFIX or set [constants.enum_prefixes]");
        }
        return Ok(manifest
            .constants
            .enum_prefixes
            .iter()
            .map(|(name, prefix)| (name.clone(), prefix.clone()))
            .collect());
    }
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, prefix)) if !name.is_empty() && !prefix.is_empty() => Ok((name.to_string(), prefix.to_string())),
            _ => bail!("invalid enum group '{arg}': expected NAME=PREFIX"),
        })
        .collect()
}

fn render(table: &ConstantTable, groups: &[(String, String)]) -> String {
    let classes: Vec<String> = groups
        .iter()
        .map(|(name, prefix)| {
            let class = render_enum_class(table, name, prefix);
            if class.ends_with("    pass\n") {
                tracing::warn!(class = %name, prefix = %prefix, "no constants match enum prefix");
            }
            class
        })
        .collect();
    format!("import enum\n\n\n{}", classes.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use salient_consts::Constant;
    use std::path::PathBuf;

    #[test]
    fn groups_from_args_and_manifest() {
        let mut manifest = SalientManifest::default();
        assert!(enum_groups(&manifest, &[]).is_err());
        assert!(enum_groups(&manifest, &["NoPrefix".into()]).is_err());

        manifest.constants.enum_prefixes.insert("KeySym".into(), "SDLK_".into());
        assert_eq!(enum_groups(&manifest, &[]).unwrap(), vec![("KeySym".to_string(), "SDLK_".to_string())]);
        assert_eq!(
            enum_groups(&manifest, &["Scancode=SDL_SCANCODE_".into()]).unwrap(),
            vec![("Scancode".to_string(), "SDL_SCANCODE_".to_string())]
        );
    }

    #[test]
    fn renders_classes() {
        let table = ConstantTable::from_constants([Constant {
            name: "SDLK_a".into(),
            value: 97,
            origin: PathBuf::new(),
        }]);
        let text = render(&table, &[("KeySym".into(), "SDLK_".into())]);
        assert!(text.starts_with("import enum\n\n\nclass KeySym(enum.IntEnum):\n"));
        assert!(text.ends_with("    a = 97\n"));
    }
}
