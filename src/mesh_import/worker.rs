//! Background thread that reads and parses mesh files.
//!
//! Parsing a large OBJ takes long enough to stall a frame loop, so file loading runs here and
//! only the finished [`MeshSource`] is handed back. Placement and BVH construction still happen
//! on the caller's side when the result is applied.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use tracing::{debug, info_span};

use super::{ImportError, ImportOptions, MeshSource};

#[derive(Clone, Debug, PartialEq)]
pub struct ImportRequest {
    pub id: u64,
    pub path: PathBuf,
    pub options: ImportOptions,
}

#[derive(Debug)]
pub struct ImportResult {
    pub request: ImportRequest,
    pub outcome: Result<MeshSource, ImportError>,
}

#[derive(Debug)]
enum Command {
    Load(ImportRequest),
    Stop,
}

pub struct ImportWorker {
    tx: Sender<Command>,
    rx: Receiver<ImportResult>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
    in_flight: usize,
}

impl ImportWorker {
    pub fn spawn() -> std::io::Result<ImportWorker> {
        let (cmd_tx, cmd_rx) = channel::<Command>();
        let (res_tx, res_rx) = channel::<ImportResult>();

        let handle = thread::Builder::new()
            .name("mesh-import".into())
            .spawn(move || worker_loop(cmd_rx, res_tx))?;

        Ok(ImportWorker {
            tx: cmd_tx,
            rx: res_rx,
            handle: Some(handle),
            next_id: 0,
            in_flight: 0,
        })
    }

    /// Queues a file for loading and returns the id its result will carry.
    pub fn request(&mut self, path: impl Into<PathBuf>, options: ImportOptions) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let request = ImportRequest {
            id,
            path: path.into(),
            options,
        };
        debug!(id = request.id, path = %request.path.display(), "Queueing mesh import");
        if self.tx.send(Command::Load(request)).is_ok() {
            self.in_flight += 1;
        }
        id
    }

    /// Number of requests whose results were not received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns a finished result, if any, without blocking.
    pub fn try_recv(&mut self) -> Option<ImportResult> {
        let result = self.rx.try_recv().ok()?;
        self.in_flight -= 1;
        Some(result)
    }

    /// Waits for the next result. Returns `None` when nothing is in flight.
    pub fn recv_blocking(&mut self) -> Option<ImportResult> {
        if self.in_flight == 0 {
            return None;
        }
        let result = self.rx.recv().ok()?;
        self.in_flight -= 1;
        Some(result)
    }

    pub fn stop(&mut self) {
        let _ = self.tx.send(Command::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ImportWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(rx: Receiver<Command>, tx: Sender<ImportResult>) {
    while let Ok(command) = rx.recv() {
        let Command::Load(request) = command else {
            break;
        };

        let outcome = {
            let _span = info_span!("load_mesh", id = request.id).entered();
            MeshSource::from_obj_file(&request.path)
        };

        if tx.send(ImportResult { request, outcome }).is_err() {
            break;
        }
    }
}
