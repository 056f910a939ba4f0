mod stream;
pub use stream::Stream;
pub use stream::Transport;

mod transaction;
pub use transaction::Transaction;

mod http_connection;
pub use http_connection::HttpConnection;
