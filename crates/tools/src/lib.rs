//! Tool surface for the agent: typed calls plus the dispatcher that
//! executes them against the memory store, the document service, and the
//! notification sink.

mod call;
mod handler;

pub use call::{
    CreatePageArgs, DeleteBlockArgs, ListSubPagesArgs, LogToNotionArgs, QueryDatabaseArgs,
    ReadPageContentArgs, RecentMemoriesArgs, RememberFactArgs, SearchMemoryArgs, SendAlertArgs,
    ToolCall, UpdatePageArgs,
};
pub use handler::Dispatcher;
