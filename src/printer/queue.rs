//! # Print Queue
//!
//! Expands print requests into ordered render jobs and dispatches them
//! to the device as one encoded buffer.
//!
//! A queue is owned by exactly one printer: it is constructed for a
//! device's model and loaded media, and callers serialize enqueue and
//! flush against that device (the server runs both under a per-device
//! lock). Jobs are dispatched strictly in enqueue order.
//!
//! ## Cut Decisions
//!
//! `enqueue` expands a request into one job per copy. Every job cuts
//! unless the batch is cut-once, in which case only the batch's last
//! job cuts. The decision depends only on the position within a single
//! batch; interleaved batches do not affect each other.
//!
//! ## Queue Lifetime
//!
//! `flush` takes the jobs out of the queue before doing any work, so
//! the queue is empty after successful and failed runs alike. A failed
//! transmission is reported to the caller, who re-enqueues if a retry
//! is wanted; the half-sent stream cannot be resumed anyway.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::EtiquetaError;
use crate::label::layout::LayoutEngine;
use crate::label::qr::QrProvider;
use crate::label::text::TextShaper;
use crate::label::{LabelKind, LabelSpec, Orientation};
use crate::printer::{MediaProfile, PrinterModel};
use crate::protocol::{RasterEncoder, Rotation};
use crate::transport::{DeviceStatus, Transport};

/// One queued render job: a label spec and its cut decision.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub spec: LabelSpec,
    pub cut: bool,
}

/// Physical rotation hint for a job, from its media kind and
/// orientation. Die-cut media lets the encoder decide.
pub fn rotation_for(kind: LabelKind, orientation: Orientation) -> Rotation {
    match (kind, orientation) {
        (LabelKind::Endless, Orientation::Standard) => Rotation::Deg0,
        (LabelKind::Endless, Orientation::Rotated) => Rotation::Deg90,
        (LabelKind::DieCut | LabelKind::RoundDieCut, _) => Rotation::Auto,
    }
}

/// Ordered job queue for one printer.
pub struct PrintQueue {
    model: PrinterModel,
    media: &'static MediaProfile,
    jobs: Vec<RenderJob>,
}

impl PrintQueue {
    pub fn new(model: PrinterModel, media: &'static MediaProfile) -> Self {
        Self {
            model,
            media,
            jobs: Vec::new(),
        }
    }

    pub fn media(&self) -> &'static MediaProfile {
        self.media
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Queued jobs, in dispatch order.
    pub fn jobs(&self) -> &[RenderJob] {
        &self.jobs
    }

    /// Append `copies` jobs for `spec`. With `cut_once` only the last
    /// copy of this batch cuts; otherwise every copy does.
    pub fn enqueue(&mut self, spec: LabelSpec, copies: u32, cut_once: bool) {
        for i in 0..copies {
            let cut = !cut_once || i == copies - 1;
            self.jobs.push(RenderJob {
                spec: spec.clone(),
                cut,
            });
        }
    }

    /// Render and dispatch every queued job, in insertion order.
    ///
    /// Each job is rendered on the physical path (no preview rotation),
    /// encoded with its rotation hint, dither flag and cut decision,
    /// and appended to one fresh command buffer. The buffer is then
    /// transmitted in a single bounded write and the device status is
    /// checked.
    ///
    /// The queue is drained up front: it is empty when this returns,
    /// whether the run succeeded or failed.
    pub fn flush<S, Q, T>(
        &mut self,
        engine: &LayoutEngine<S, Q>,
        transport: &mut T,
        timeout: Duration,
    ) -> Result<DeviceStatus, EtiquetaError>
    where
        S: TextShaper,
        Q: QrProvider,
        T: Transport + ?Sized,
    {
        let jobs = std::mem::take(&mut self.jobs);
        if jobs.is_empty() {
            debug!("flush of empty queue");
            return Ok(DeviceStatus::default());
        }

        let mut encoder = RasterEncoder::new(self.model, self.media)?;
        for job in &jobs {
            let bitmap = engine.generate(&job.spec, false)?;
            let rotation = rotation_for(job.spec.kind, job.spec.orientation);
            encoder.encode_label(&bitmap, job.spec.content.wants_dither(), job.cut, rotation)?;
        }

        let data = encoder.finish();
        let status = transport.transmit(&data, timeout)?;
        info!(
            bytes = data.len(),
            pages = jobs.len(),
            media = self.media.id,
            "sent print job"
        );
        if let Some(reply) = &status.response {
            info!(response = ?reply, "printer status");
        }
        status.ensure_ok()?;
        Ok(status)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> PrintQueue {
        PrintQueue::new(PrinterModel::Ql800, MediaProfile::lookup("62").unwrap())
    }

    fn cut_flags(q: &PrintQueue) -> Vec<bool> {
        q.jobs().iter().map(|j| j.cut).collect()
    }

    #[test]
    fn test_cut_once_cuts_only_last_copy() {
        let mut q = queue();
        q.enqueue(LabelSpec::default(), 3, true);
        assert_eq!(cut_flags(&q), vec![false, false, true]);
    }

    #[test]
    fn test_cut_every_copy_by_default() {
        let mut q = queue();
        q.enqueue(LabelSpec::default(), 3, false);
        assert_eq!(cut_flags(&q), vec![true, true, true]);
    }

    #[test]
    fn test_cut_decisions_are_per_batch() {
        let mut q = queue();
        q.enqueue(LabelSpec::default(), 2, true);
        q.enqueue(LabelSpec::default(), 2, false);
        q.enqueue(LabelSpec::default(), 1, true);
        assert_eq!(cut_flags(&q), vec![false, true, true, true, true]);
    }

    #[test]
    fn test_zero_copies_enqueues_nothing() {
        let mut q = queue();
        q.enqueue(LabelSpec::default(), 0, false);
        assert!(q.is_empty());
    }

    #[test]
    fn test_rotation_table() {
        assert_eq!(
            rotation_for(LabelKind::Endless, Orientation::Standard),
            Rotation::Deg0
        );
        assert_eq!(
            rotation_for(LabelKind::Endless, Orientation::Rotated),
            Rotation::Deg90
        );
        assert_eq!(
            rotation_for(LabelKind::DieCut, Orientation::Standard),
            Rotation::Auto
        );
        assert_eq!(
            rotation_for(LabelKind::RoundDieCut, Orientation::Rotated),
            Rotation::Auto
        );
    }

    #[test]
    fn test_flush_of_empty_queue_skips_device() {
        struct RefuseTransport;
        impl Transport for RefuseTransport {
            fn transmit(
                &mut self,
                _data: &[u8],
                _timeout: Duration,
            ) -> Result<DeviceStatus, EtiquetaError> {
                panic!("empty queue must not touch the device");
            }
        }

        let mut q = queue();
        let engine = LayoutEngine::new();
        let status = q
            .flush(&engine, &mut RefuseTransport, Duration::from_secs(1))
            .unwrap();
        assert_eq!(status.bytes_written, 0);
    }
}
