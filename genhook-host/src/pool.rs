//! Chunk worker threads generating the chunks of a host world, like the host's own
//! chunk task scheduler would.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Sender, Receiver, TrySendError};
use tracing::debug;

use genhook::host::HostWorld;
use genhook::chunk::Chunk;


/// A pool of worker threads generating chunks of a single world, each worker reads
/// the world's pipeline when it starts a chunk.
pub struct ChunkWorkerPool {
    request_sender: Sender<(i32, i32)>,
    reply_receiver: Receiver<GeneratedChunk>,
}

/// A chunk generated by a worker.
pub struct GeneratedChunk {
    pub cx: i32,
    pub cz: i32,
    pub chunk: Box<Chunk>,
}

impl ChunkWorkerPool {

    /// Create a pool with the given number of workers, at most `capacity` requests
    /// and replies can be pending at the same time.
    pub fn new(world: Arc<HostWorld>, workers_count: usize, capacity: usize) -> std::io::Result<Self> {

        let (
            request_sender,
            request_receiver,
        ) = bounded::<(i32, i32)>(capacity);

        let (
            reply_sender,
            reply_receiver,
        ) = bounded(capacity);

        for i in 0..workers_count {

            let world = Arc::clone(&world);
            let request_receiver = request_receiver.clone();
            let reply_sender = reply_sender.clone();

            thread::Builder::new()
                .name(format!("Chunk Worker #{i}"))
                .spawn(move || {
                    while let Ok((cx, cz)) = request_receiver.recv() {
                        let chunk = world.generate_chunk(cx, cz);
                        // The receiver side has been dropped, we should shutdown.
                        if reply_sender.send(GeneratedChunk { cx, cz, chunk }).is_err() {
                            break;
                        }
                    }
                    debug!("chunk worker #{i} stopped");
                })?;

        }

        Ok(Self {
            request_sender,
            reply_receiver,
        })

    }

    /// Request a chunk to be generated, this function returns true if the request has
    /// been successfully enqueued.
    pub fn request(&self, cx: i32, cz: i32) -> bool {
        match self.request_sender.try_send((cx, cz)) {
            Ok(_) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    /// Block until the next generated chunk is available, none if all workers are
    /// gone.
    pub fn recv(&self) -> Option<GeneratedChunk> {
        self.reply_receiver.recv().ok()
    }

}
