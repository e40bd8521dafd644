pub mod inv_server;
