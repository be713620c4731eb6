//! Synthesized public header for a compiled module.
//!
//! Upstream grammar packages do not reliably ship a header, so one is
//! generated from the module name alone. It is staged in the module's working
//! directory and installed next to the other module headers.

use std::fs;
use std::path::{Path, PathBuf};

use grove_core::ModuleSpec;
use grove_core::utils::{accessor_name, header_file_name, header_guard};

use crate::context::BuildContext;
use crate::{Error, Result};

/// Header text for `name`. Deterministic: same name, same bytes.
pub fn synthesize_header(name: &str) -> String {
    let guard = header_guard(name);
    let accessor = accessor_name(name);
    format!(
        "#ifndef {guard}\n\
         #define {guard}\n\
         \n\
         typedef struct TSLanguage TSLanguage;\n\
         \n\
         #ifdef __cplusplus\n\
         extern \"C\" {{\n\
         #endif\n\
         \n\
         const TSLanguage *{accessor}(void);\n\
         \n\
         #ifdef __cplusplus\n\
         }}\n\
         #endif\n\
         \n\
         #endif // {guard}\n"
    )
}

/// Write `contents` to `path` unless it already holds exactly that.
pub fn write_header(module: &str, path: &Path, contents: &str) -> Result<()> {
    let header_err = |source| Error::Header {
        module: module.to_owned(),
        path: path.to_path_buf(),
        source,
    };

    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(header_err)?;
    }
    fs::write(path, contents).map_err(header_err)
}

/// Stage the header under the module's working directory, then install it.
///
/// Returns the installed path.
pub fn stage_and_install(ctx: &BuildContext<'_>, spec: &ModuleSpec) -> Result<PathBuf> {
    let contents = synthesize_header(spec.name);
    let file_name = header_file_name(spec.name);

    let staged = ctx.module_dir(spec).join("include").join(&file_name);
    write_header(spec.name, &staged, &contents)?;

    let installed = ctx.header_install_dir().join(&file_name);
    write_header(spec.name, &installed, &contents)?;

    tracing::debug!(module = spec.name, path = %installed.display(), "installed header");
    Ok(installed)
}
