use crate::image::{AllocationError, ImageBuffer};

/// The pair of images the controller owns: the kernel writes `raw`, the
/// compositor writes `converged`.
#[derive(Debug, Clone)]
pub struct RenderTargets {
    pub raw: ImageBuffer,
    pub converged: ImageBuffer,
}

impl RenderTargets {
    pub fn allocate(width: u32, height: u32) -> Result<Self, AllocationError> {
        let raw = ImageBuffer::try_new(width, height)?;
        let converged = ImageBuffer::try_new(width, height)?;
        log::info!("Allocated {}x{} render targets", width, height);
        Ok(Self { raw, converged })
    }

    pub fn size(&self) -> (u32, u32) {
        self.raw.size()
    }

    /// Make `slot` hold targets of `size`, reusing the current pair when it
    /// already matches. Returns the targets and whether they were reallocated.
    ///
    /// The old pair is released before the new one is reserved; on failure
    /// `slot` is left empty.
    pub fn ensure(
        slot: &mut Option<Self>,
        size: (u32, u32),
    ) -> Result<(&mut Self, bool), AllocationError> {
        let (targets, reallocated) = match slot.take() {
            Some(targets) if targets.size() == size => (targets, false),
            old => {
                drop(old);
                (Self::allocate(size.0, size.1)?, true)
            }
        };
        Ok((slot.insert(targets), reallocated))
    }
}
