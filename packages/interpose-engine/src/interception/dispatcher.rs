// packages/interpose-engine/src/interception/dispatcher.rs
//! Call-time behavior of an intercepted operation
//!
//! Order is fixed: before -> (stub xor origin) -> after. Each step reads
//! the table's current registry, so a behavior swapped between calls takes
//! effect on the next call without reinstalling anything.

use crate::interception::context::{AfterCall, BeforeCall, Block, OriginalCall, StubCall};
use crate::interception::operation_table::{OperationTable, Origin};
use crate::observability::DISPATCH_COUNTER;
use crate::utils::errors::Result;
use serde_json::Value;
use tracing::trace;

pub(crate) fn dispatch<R>(
    table: &OperationTable<R>,
    receiver: &R,
    operation: &str,
    origin: Origin<R>,
    args: &[Value],
    block: Option<&Block<'_>>,
) -> Result<Value> {
    metrics::counter!(DISPATCH_COUNTER).increment(1);
    trace!("Dispatching {}::{} with {} args", table.owner(), operation, args.len());

    if let Some(before) = table.before_hook(operation) {
        let call = BeforeCall {
            operation: operation.to_string(),
            args: args.to_vec(),
        };
        before(receiver, &call, block)?;
    }

    let result = match table.stub_hook(operation) {
        Some(stub) => {
            let call = StubCall {
                original: OriginalCall {
                    receiver,
                    table,
                    origin,
                    operation,
                },
                args: args.to_vec(),
            };
            stub(receiver, &call, block)?
        }
        None => origin.call(table, receiver, operation, args, block)?,
    };

    if let Some(after) = table.after_hook(operation) {
        let call = AfterCall {
            operation: operation.to_string(),
            args: args.to_vec(),
            result: result.clone(),
        };
        after(receiver, &call)?;
    }

    Ok(result)
}
