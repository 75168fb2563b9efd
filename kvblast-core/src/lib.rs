#![warn(missing_docs)]
//! kvblast Core
//!
//! The measurement primitives of the load harness:
//! - the fixed operation vocabulary and the descriptors drawn from it
//! - the randomized workload generator (one independent stream per worker)
//! - the process invoker that times one blocking client call
//! - the cancellation token workers poll between operations

mod cancel;
mod invoke;
mod op;
mod workload;

pub use cancel::{CancelToken, install_sigint_handler};
pub use invoke::{ClientInvoker, ExecutionResult, InvokeError, ProcessInvoker};
pub use op::{OpKind, OperationDescriptor};
pub use workload::{WorkloadGenerator, WorkloadSpec};
