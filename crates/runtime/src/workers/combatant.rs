//! Per-combatant worker.
//!
//! Every ledger mutation for one combatant runs on that combatant's task, in
//! the order the commands were sent. Movement updates are fire-and-forget;
//! everything else replies once applied. Different combatants run
//! concurrently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracker_core::{
    ActionLogEntry, ActorId, CombatantId, Declaration, EntryTarget, ItemId, MovementUpdate,
    SourceId, SustainDecision,
};

use crate::api::{Result, RuntimeError};
use crate::services::TrackerContext;

/// Commands accepted by a [`CombatantWorker`].
pub(crate) enum Command {
    Declare {
        decl: Declaration,
        reply: oneshot::Sender<Result<()>>,
    },
    Forget {
        source: SourceId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Path snapshot; no reply.
    Move { update: MovementUpdate },
    StartTurn {
        reply: oneshot::Sender<Result<()>>,
    },
    EndTurn {
        reply: oneshot::Sender<Result<()>>,
    },
    Sustain {
        item_id: ItemId,
        item_name: String,
        choice: SustainDecision,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Manual entry recorded by the authority.
    Record {
        entry: ActionLogEntry,
        reply: oneshot::Sender<Result<()>>,
    },
    Remove {
        target: EntryTarget,
        reply: oneshot::Sender<Result<Option<ActionLogEntry>>>,
    },
    /// Replies once every earlier command has been processed.
    Flush { reply: oneshot::Sender<()> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Declare { .. } => "Declare",
            Command::Forget { .. } => "Forget",
            Command::Move { .. } => "Move",
            Command::StartTurn { .. } => "StartTurn",
            Command::EndTurn { .. } => "EndTurn",
            Command::Sustain { .. } => "Sustain",
            Command::Record { .. } => "Record",
            Command::Remove { .. } => "Remove",
            Command::Flush { .. } => "Flush",
        }
    }
}

/// Background task that applies one combatant's commands in order.
pub(crate) struct CombatantWorker {
    combatant: CombatantId,
    actor: ActorId,
    ctx: Arc<TrackerContext>,
    command_rx: mpsc::Receiver<Command>,
    pending_moves: Arc<AtomicUsize>,
}

impl CombatantWorker {
    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        debug!(combatant = %self.combatant, "combatant worker started");
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!(combatant = %self.combatant, "combatant worker stopped");
    }

    fn handle_command(&self, cmd: Command) {
        let name = cmd.name();
        let (combatant, actor) = (&self.combatant, &self.actor);
        match cmd {
            Command::Declare { decl, reply } => {
                respond(name, reply, self.ctx.declare(combatant, actor, decl));
            }
            Command::Forget { source, reply } => {
                respond(
                    name,
                    reply,
                    self.ctx.forget_declaration(combatant, actor, &source),
                );
            }
            Command::Move { update } => {
                if let Err(err) = self.ctx.reconcile_movement(actor, &update) {
                    warn!(%combatant, %err, "movement reconciliation failed");
                }
                self.pending_moves.fetch_sub(1, Ordering::AcqRel);
            }
            Command::StartTurn { reply } => {
                respond(name, reply, self.ctx.start_turn(combatant, actor));
            }
            Command::EndTurn { reply } => {
                respond(name, reply, self.ctx.end_turn(combatant, actor));
            }
            Command::Sustain {
                item_id,
                item_name,
                choice,
                reply,
            } => {
                let result = self
                    .ctx
                    .sustain_choice(combatant, actor, item_id, item_name, choice);
                respond(name, reply, result);
            }
            Command::Record { entry, reply } => {
                respond(name, reply, self.ctx.add_entry(combatant, actor, entry));
            }
            Command::Remove { target, reply } => {
                respond(name, reply, self.ctx.remove_entry(combatant, actor, &target));
            }
            Command::Flush { reply } => respond(name, reply, ()),
        }
    }
}

fn respond<T>(command: &str, reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("{command} reply channel closed (caller dropped)");
    }
}

struct WorkerHandle {
    command_tx: mpsc::Sender<Command>,
    pending_moves: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

/// Spawns workers on first use and routes commands to them.
pub(crate) struct WorkerPool {
    ctx: Arc<TrackerContext>,
    capacity: usize,
    workers: Mutex<HashMap<CombatantId, WorkerHandle>>,
}

impl WorkerPool {
    pub(crate) fn new(ctx: Arc<TrackerContext>, capacity: usize) -> Self {
        Self {
            ctx,
            capacity: capacity.max(1),
            workers: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CombatantId, WorkerHandle>>> {
        self.workers
            .lock()
            .map_err(|_| RuntimeError::StatePoisoned("combatant workers"))
    }

    fn sender(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
    ) -> Result<(mpsc::Sender<Command>, Arc<AtomicUsize>)> {
        let mut workers = self.lock()?;
        if let Some(handle) = workers.get(combatant)
            && !handle.command_tx.is_closed()
        {
            return Ok((handle.command_tx.clone(), handle.pending_moves.clone()));
        }

        let (command_tx, command_rx) = mpsc::channel(self.capacity);
        let pending_moves = Arc::new(AtomicUsize::new(0));
        let worker = CombatantWorker {
            combatant: combatant.clone(),
            actor: actor.clone(),
            ctx: Arc::clone(&self.ctx),
            command_rx,
            pending_moves: Arc::clone(&pending_moves),
        };
        let task = tokio::spawn(worker.run());
        workers.insert(
            combatant.clone(),
            WorkerHandle {
                command_tx: command_tx.clone(),
                pending_moves: Arc::clone(&pending_moves),
                task,
            },
        );
        Ok((command_tx, pending_moves))
    }

    /// Sends a command built around a fresh reply channel and awaits the reply.
    pub(crate) async fn request<T>(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (command_tx, _) = self.sender(combatant, actor)?;
        let (reply_tx, reply_rx) = oneshot::channel();

        command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed(combatant.clone()))?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queues a path snapshot behind the combatant's earlier commands.
    pub(crate) async fn enqueue_move(
        &self,
        actor: &ActorId,
        update: MovementUpdate,
    ) -> Result<()> {
        let combatant = update.combatant.clone();
        let (command_tx, pending_moves) = self.sender(&combatant, actor)?;
        pending_moves.fetch_add(1, Ordering::AcqRel);
        if command_tx.send(Command::Move { update }).await.is_err() {
            pending_moves.fetch_sub(1, Ordering::AcqRel);
            return Err(RuntimeError::CommandChannelClosed(combatant));
        }
        Ok(())
    }

    /// Movement updates accepted but not yet applied.
    pub(crate) fn queue_depth(&self, combatant: &CombatantId) -> usize {
        self.lock()
            .ok()
            .and_then(|workers| {
                workers
                    .get(combatant)
                    .map(|handle| handle.pending_moves.load(Ordering::Acquire))
            })
            .unwrap_or(0)
    }

    /// Waits until every worker has drained what was queued before this call.
    pub(crate) async fn flush(&self) -> Result<()> {
        let senders: Vec<(CombatantId, mpsc::Sender<Command>)> = self
            .lock()?
            .iter()
            .map(|(combatant, handle)| (combatant.clone(), handle.command_tx.clone()))
            .collect();

        for (combatant, command_tx) in senders {
            let (reply_tx, reply_rx) = oneshot::channel();
            command_tx
                .send(Command::Flush { reply: reply_tx })
                .await
                .map_err(|_| RuntimeError::CommandChannelClosed(combatant))?;
            reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?;
        }
        Ok(())
    }

    /// Stops every worker; queued commands are dropped. Returns once no
    /// worker can touch the documents again.
    pub(crate) async fn abort_all(&self) -> Result<usize> {
        let handles: Vec<WorkerHandle> = self.lock()?.drain().map(|(_, handle)| handle).collect();
        let count = handles.len();
        for handle in &handles {
            handle.task.abort();
        }
        for handle in handles {
            if let Err(err) = handle.task.await
                && !err.is_cancelled()
            {
                return Err(RuntimeError::WorkerJoin(err));
            }
        }
        Ok(count)
    }

    /// Closes every queue and waits for the workers to finish what they hold.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        let handles: Vec<WorkerHandle> = self.lock()?.drain().map(|(_, handle)| handle).collect();
        for handle in handles {
            drop(handle.command_tx);
            handle.task.await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}
