//! Sample load scripts.

use camino::{Utf8Path, Utf8PathBuf};

use super::errors::ScriptError;

/// A resource with one cyclic timer, started after its interval is set.
pub const SIMPLE: &str = r#"<Request ID="1" Action="CREATE"><Resource Name="SIMPLE_APP"/></Request>
<Request ID="2" Action="CREATE"><FB Name="MY_TIMER" Type="E_CYCLE" Resource="SIMPLE_APP"/></Request>
<Request ID="3" Action="WRITE"><FB Name="MY_TIMER" Resource="SIMPLE_APP"><Parameter Name="DT" Value="T#500ms"/></FB></Request>
<Request ID="4" Action="START"><Resource Name="SIMPLE_APP"/></Request>"#;

/// String concatenation network on an embedded resource.
pub const TASK5: &str = r#"<Request ID="2" Action="CREATE"><FB Name="EMB_RES" Type="EMB_RES"/></Request>
<Request ID="3" Action="CREATE"><FB Name="STRING2STRING" Type="STRING2STRING"/></Request>
<Request ID="4" Action="CREATE"><FB Name="STRING2STRING_1" Type="STRING2STRING"/></Request>
<Request ID="5" Action="CREATE"><FB Name="APPEND_STRING_2" Type="APPEND_STRING_2"/></Request>
<Request ID="6" Action="CREATE"><Connection Source="STRING2STRING.OUT" Destination="/APPEND_STRING_2.IN_1"/></Request>
<Request ID="7" Action="CREATE"><Connection Source="STRING2STRING_1.OUT" Destination="/APPEND_STRING_2.IN_2"/></Request>
<Request ID="7" Action="START"/>"#;

/// File names and contents written by [`write_examples`].
pub const FILES: [(&str, &str); 2] = [
    ("task5_example.fboot", TASK5),
    ("simple_example.fboot", SIMPLE),
];

/// Write the sample scripts into `dir`, creating it if needed.
///
/// # Errors
/// Returns [`ScriptError::Write`] if the directory or a file cannot be
/// written.
pub fn write_examples(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ScriptError> {
    std::fs::create_dir_all(dir).map_err(|source| ScriptError::Write {
        path: dir.to_owned(),
        source,
    })?;
    FILES
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            std::fs::write(&path, content).map_err(|source| ScriptError::Write {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        })
        .collect()
}
