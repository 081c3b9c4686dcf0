//! Program lifecycle shim.
//!
//! Consumers see the three-call lifecycle — make, init, destroy — while the
//! actual work is forwarded through the owning context's backend table.

use log::trace;

use crate::utils::Handle;

use super::context::Context;
use super::error::{GpuError, Result};
use super::structs::{Program, ProgramInfo, ProgramKind, ProgramState, StageSources};

impl Context {
    /// Allocate a new program bound to this context.
    ///
    /// The record starts in [`ProgramState::Allocated`]; no compilation
    /// happens here. Fails with [`GpuError::AllocationFailure`] once
    /// `program_capacity` handles are live.
    pub fn make_program(&mut self, info: &ProgramInfo) -> Result<Handle<Program>> {
        // Secure the pool slot before asking the backend for state, so an
        // exhausted pool never strands backend-private allocations.
        let record = Program {
            backend_state: None,
            state: ProgramState::Allocated,
            kind: None,
            debug_name: info.debug_name.to_string(),
        };
        let handle = match self.programs.insert(record) {
            Some(handle) => handle,
            None => return Err(GpuError::AllocationFailure("program pool")),
        };

        let backend_state = match self.backend.program_create() {
            Ok(state) => state,
            Err(err) => {
                self.programs.take(handle);
                return Err(err);
            }
        };

        match self.programs.get_mut_ref(handle) {
            Some(record) => record.backend_state = Some(backend_state),
            None => {
                self.backend.program_release(backend_state);
                return Err(GpuError::InvalidHandle);
            }
        }

        self.live_programs += 1;
        trace!("created program '{}' in slot {}", info.debug_name, handle.slot);
        Ok(handle)
    }

    /// Initialize a program with stage sources.
    ///
    /// Exactly one of the graphics pair (vertex + fragment) or the compute
    /// stage may be supplied; mixing the families is a
    /// [`GpuError::StageConflict`]. Any failure, stage validation included,
    /// moves the record to [`ProgramState::Failed`], which stays releasable
    /// so cleanup paths are uniform across outcomes. A handle that already
    /// left the allocated state is rejected without dispatching to the
    /// backend.
    pub fn init_program(&mut self, handle: Handle<Program>, stages: &StageSources) -> Result<()> {
        let record = self
            .programs
            .get_mut_ref(handle)
            .ok_or(GpuError::InvalidHandle)?;

        if record.state != ProgramState::Allocated {
            return Err(GpuError::AlreadyInitialized);
        }

        let kind = match stages.classify() {
            Ok(kind) => kind,
            Err(err) => {
                record.state = ProgramState::Failed;
                return Err(err);
            }
        };

        let backend_state = record
            .backend_state
            .as_mut()
            .ok_or(GpuError::InvalidHandle)?;

        match self.backend.program_init(backend_state, stages) {
            Ok(()) => {
                record.state = ProgramState::Initialized;
                record.kind = Some(kind);
                trace!("initialized program '{}' as {:?}", record.debug_name, kind);
                Ok(())
            }
            Err(err) => {
                record.state = ProgramState::Failed;
                Err(err)
            }
        }
    }

    /// Release the program held in `slot`, clearing the slot.
    ///
    /// An empty slot or a stale handle is a no-op, so cleanup paths may run
    /// after an earlier release without faulting or double-dispatching. A
    /// live handle dispatches exactly one backend release, whether or not
    /// the program was ever initialized.
    pub fn destroy_program(&mut self, slot: &mut Option<Handle<Program>>) {
        let Some(handle) = slot.take() else {
            return;
        };

        let Some(mut record) = self.programs.take(handle) else {
            return;
        };

        if let Some(state) = record.backend_state.take() {
            self.backend.program_release(state);
        }

        self.live_programs -= 1;
        trace!("released program '{}'", record.debug_name);
    }

    /// Lifecycle state of a live program.
    pub fn program_state(&self, handle: Handle<Program>) -> Result<ProgramState> {
        self.programs
            .get_ref(handle)
            .map(|record| record.state)
            .ok_or(GpuError::InvalidHandle)
    }

    /// Pipeline family recorded by a successful init.
    pub fn program_kind(&self, handle: Handle<Program>) -> Result<Option<ProgramKind>> {
        self.programs
            .get_ref(handle)
            .map(|record| record.kind)
            .ok_or(GpuError::InvalidHandle)
    }

    /// Whether `handle` refers to a live, successfully initialized program.
    pub fn program_is_initialized(&self, handle: Handle<Program>) -> bool {
        matches!(self.program_state(handle), Ok(ProgramState::Initialized))
    }
}
