//! Background decode thread.
//!
//! Packets are decoded, interned and assembled off the caller's thread. Frames come back in
//! arrival order, each paired with the texture images first seen since the previous frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;

use crate::{
    assets::texture_cache::{ContentKey, DecodedImage},
    foundation::error::{LayerScopeError, LayerScopeResult},
    frame::model::Frame,
    session::assembler::{FrameAssembler, SessionOpts, SessionStats},
};

/// One finalized frame and the images it introduced.
#[derive(Debug)]
pub struct FrameMessage {
    pub frame: Frame,
    pub images: Vec<(ContentKey, Arc<DecodedImage>)>,
}

enum WorkerMsg {
    Packet { generation: u64, bytes: Vec<u8> },
    Reset,
}

struct Output {
    generation: u64,
    msg: FrameMessage,
}

/// Handle to a background thread owning a [`FrameAssembler`].
pub struct DecodeWorker {
    tx: Option<mpsc::SyncSender<WorkerMsg>>,
    rx: mpsc::Receiver<Output>,
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<SessionStats>>,
}

impl DecodeWorker {
    pub fn spawn(opts: SessionOpts) -> LayerScopeResult<Self> {
        let cap = opts.worker_channel_capacity.max(1);
        let (tx, worker_rx) = mpsc::sync_channel::<WorkerMsg>(cap);
        let (worker_tx, rx) = mpsc::channel::<Output>();
        let generation = Arc::new(AtomicU64::new(0));

        let gen_worker = Arc::clone(&generation);
        let handle = std::thread::Builder::new()
            .name("layerscope-decode".to_string())
            .spawn(move || run(FrameAssembler::new(opts), worker_rx, worker_tx, gen_worker))?;

        Ok(Self {
            tx: Some(tx),
            rx,
            generation,
            handle: Some(handle),
        })
    }

    /// Queue one wire packet. Blocks while the queue is full.
    pub fn send(&self, bytes: Vec<u8>) -> LayerScopeResult<()> {
        let generation = self.generation.load(Ordering::Acquire);
        self.sender()?
            .send(WorkerMsg::Packet { generation, bytes })
            .map_err(|_| LayerScopeError::protocol("decode worker is not accepting packets"))
    }

    /// End the session: queued packets and the active frame are discarded, and frames not yet
    /// received are dropped.
    pub fn end(&self) -> LayerScopeResult<()> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "decode worker session ended");
        self.sender()?
            .send(WorkerMsg::Reset)
            .map_err(|_| LayerScopeError::protocol("decode worker is not accepting packets"))
    }

    /// Block until the next frame. `None` once the worker has stopped.
    pub fn recv(&self) -> Option<FrameMessage> {
        loop {
            let out = self.rx.recv().ok()?;
            if let Some(msg) = self.current(out) {
                return Some(msg);
            }
        }
    }

    /// Next frame if one is ready.
    pub fn try_recv(&self) -> Option<FrameMessage> {
        loop {
            let out = self.rx.try_recv().ok()?;
            if let Some(msg) = self.current(out) {
                return Some(msg);
            }
        }
    }

    /// Stop accepting packets, wait for the queue to drain and return the remaining frames with
    /// the worker's counters.
    pub fn finish(mut self) -> LayerScopeResult<(Vec<FrameMessage>, SessionStats)> {
        self.tx.take();
        let stats = self
            .handle
            .take()
            .map(|h| h.join())
            .transpose()
            .map_err(|_| LayerScopeError::protocol("decode worker panicked"))?
            .unwrap_or_default();

        let mut rest = Vec::new();
        while let Ok(out) = self.rx.try_recv() {
            if let Some(msg) = self.current(out) {
                rest.push(msg);
            }
        }
        Ok((rest, stats))
    }

    fn sender(&self) -> LayerScopeResult<&mpsc::SyncSender<WorkerMsg>> {
        self.tx
            .as_ref()
            .ok_or_else(|| LayerScopeError::protocol("decode worker already finished"))
    }

    fn current(&self, out: Output) -> Option<FrameMessage> {
        (out.generation == self.generation.load(Ordering::Acquire)).then_some(out.msg)
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

fn run(
    mut assembler: FrameAssembler,
    rx: mpsc::Receiver<WorkerMsg>,
    tx: mpsc::Sender<Output>,
    generation: Arc<AtomicU64>,
) -> SessionStats {
    let mut seen = generation.load(Ordering::Acquire);

    for msg in rx {
        let current = generation.load(Ordering::Acquire);
        if current != seen {
            assembler.end();
            seen = current;
        }

        let WorkerMsg::Packet {
            generation: packet_gen,
            bytes,
        } = msg
        else {
            continue;
        };
        if packet_gen != current {
            continue;
        }

        if let Some(frame) = assembler.input(&bytes) {
            let images = assembler.take_new_images();
            let out = Output {
                generation: current,
                msg: FrameMessage { frame, images },
            };
            if tx.send(out).is_err() {
                break;
            }
        }
    }

    let stats = assembler.stats();
    tracing::debug!(
        packets = stats.packets_processed,
        frames = stats.frames_emitted,
        "decode worker stopped"
    );
    stats
}
