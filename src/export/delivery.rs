//! Handing a finished PDF to the host.

use std::io;
use std::time::Duration;

use serde::Serialize;

/// How the PDF reached the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Saved under its file name by the host's save facility.
    DirectSave,
    /// Opened through a short-lived object URL in a new view.
    ObjectUrl,
}

/// Host capabilities for delivering generated bytes.
///
/// Hosts whose save facility is unreliable (Safari, iOS) report
/// `supports_direct_save() == false` and get an object URL instead.
pub trait DeliveryRuntime {
    /// Whether [`DeliveryRuntime::save_file`] can be used.
    fn supports_direct_save(&self) -> bool;

    /// Save `pdf` under `file_name`.
    fn save_file(&mut self, file_name: &str, pdf: &[u8]) -> io::Result<()>;

    /// Open `pdf` in a new view and release the URL after `revoke_after`.
    fn open_object_url(&mut self, file_name: &str, pdf: &[u8], revoke_after: Duration)
        -> io::Result<()>;
}

/// Deliver through the best method the runtime offers.
pub fn deliver(
    runtime: &mut dyn DeliveryRuntime,
    file_name: &str,
    pdf: &[u8],
    revoke_after: Duration,
) -> io::Result<DeliveryMethod> {
    if runtime.supports_direct_save() {
        runtime.save_file(file_name, pdf)?;
        log::info!("saved {} ({} bytes)", file_name, pdf.len());
        Ok(DeliveryMethod::DirectSave)
    } else {
        runtime.open_object_url(file_name, pdf, revoke_after)?;
        log::info!(
            "opened {} via object url ({} bytes, revoked after {:?})",
            file_name,
            pdf.len(),
            revoke_after
        );
        Ok(DeliveryMethod::ObjectUrl)
    }
}

/// Runtime that writes PDFs into a directory.
///
/// Direct save is always available; [`DeliveryRuntime::open_object_url`]
/// falls back to writing the file as well.
#[derive(Clone, Debug)]
pub struct DirectoryRuntime {
    root: std::path::PathBuf,
}

impl DirectoryRuntime {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target path for a file name. Path separators are replaced.
    pub fn path_for(&self, file_name: &str) -> std::path::PathBuf {
        let sanitized: String = file_name
            .chars()
            .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
            .collect();
        self.root.join(sanitized)
    }
}

impl DeliveryRuntime for DirectoryRuntime {
    fn supports_direct_save(&self) -> bool {
        true
    }

    fn save_file(&mut self, file_name: &str, pdf: &[u8]) -> io::Result<()> {
        std::fs::write(self.path_for(file_name), pdf)
    }

    fn open_object_url(
        &mut self,
        file_name: &str,
        pdf: &[u8],
        _revoke_after: Duration,
    ) -> io::Result<()> {
        self.save_file(file_name, pdf)
    }
}
