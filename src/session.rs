//! # Printer Session
//!
//! The stateful host-facing surface: prepare an output document for an
//! element once, then print, preview or save it any number of times. The
//! session is an explicit object owned by the host binding — there is no
//! hidden global printer — and it caches the last generated document so
//! repeated calls against the same element skip the whole pipeline.
//!
//! Printing goes through a single hidden frame owned by the host shell.
//! On construction the printer removes any stale frame before creating a
//! fresh one, so re-creating printers never accumulates hidden frames in
//! the host document.

use std::path::Path;

use log::debug;

use crate::assemble::assemble;
use crate::builder::DocumentBuilder;
use crate::error::PagecutError;
use crate::events::{Notifier, PrintEvent};
use crate::model::{ContentTree, NodeId};
use crate::options::PrintOptions;
use crate::raster::Rasterizer;

/// Identifier of the hidden print frame inside the host document.
pub const PRINT_FRAME_ID: &str = "pagecut-printer";

/// The host shell operations the session needs: hidden-frame lifecycle,
/// triggering the print dialog, and opening a preview context.
///
/// Implementations that cannot perform an operation (headless hosts)
/// return [`PagecutError::Host`].
pub trait PrintHost {
    fn frame_exists(&self, id: &str) -> bool;
    fn remove_frame(&mut self, id: &str);
    fn create_hidden_frame(&mut self, id: &str);
    /// Load `document` into the frame and invoke the print dialog.
    fn print_frame(&mut self, id: &str, document: &[u8]) -> Result<(), PagecutError>;
    /// Open `document` in a new viewing context.
    fn open_preview(&mut self, document: &[u8]) -> Result<(), PagecutError>;
}

struct Session<B> {
    key: String,
    options: PrintOptions,
    document: B,
}

/// A printer bound to one rasterizer and one host shell.
pub struct Printer<R, B, H> {
    rasterizer: R,
    host: H,
    notifier: Option<Notifier>,
    session: Option<Session<B>>,
}

impl<R, B, H> Printer<R, B, H>
where
    R: Rasterizer,
    B: DocumentBuilder,
    H: PrintHost,
{
    /// Create a printer, replacing any stale hidden frame with a fresh one.
    pub fn new(rasterizer: R, mut host: H) -> Self {
        if host.frame_exists(PRINT_FRAME_ID) {
            host.remove_frame(PRINT_FRAME_ID);
        }
        host.create_hidden_frame(PRINT_FRAME_ID);
        Printer {
            rasterizer,
            host,
            notifier: None,
            session: None,
        }
    }

    /// Register a notification callback for generation outcomes.
    pub fn with_notifier(mut self, notifier: impl Fn(&PrintEvent) + Send + Sync + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Prepare (or reuse) the output document for the element identified by
    /// `key`. A session generated for the same key with the same options is
    /// reused untouched; anything else triggers a full regeneration and
    /// replaces the session.
    pub async fn init(
        &mut self,
        key: &str,
        tree: &ContentTree,
        root: NodeId,
        options: PrintOptions,
    ) -> Result<(), PagecutError> {
        if let Some(session) = &self.session {
            if session.key == key && session.options == options {
                debug!("reusing cached document for '{}'", key);
                return Ok(());
            }
        }

        match assemble::<R, B>(tree, root, &options, &self.rasterizer).await {
            Ok(document) => {
                self.session = Some(Session {
                    key: key.to_string(),
                    options,
                    document,
                });
                self.notify(&PrintEvent::Generated);
                Ok(())
            }
            Err(error) => {
                self.session = None;
                self.notify(&PrintEvent::GenerateError {
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Load the generated document into the hidden frame and invoke the
    /// host print dialog.
    pub fn print(&mut self) -> Result<(), PagecutError> {
        let bytes = self.document()?.output();
        self.host.print_frame(PRINT_FRAME_ID, &bytes)
    }

    /// Open the generated document in a new viewing context.
    pub fn preview(&mut self) -> Result<(), PagecutError> {
        let bytes = self.document()?.output();
        self.host.open_preview(&bytes)
    }

    /// Persist the generated document under `path`.
    pub fn save(&self, path: &Path) -> Result<(), PagecutError> {
        self.document()?.save(path)
    }

    /// The generated document, if `init` has succeeded.
    pub fn document(&self) -> Result<&B, PagecutError> {
        self.session
            .as_ref()
            .map(|session| &session.document)
            .ok_or(PagecutError::NoSession)
    }

    fn notify(&self, event: &PrintEvent) {
        if let Some(notifier) = &self.notifier {
            notifier(event);
        }
    }
}
