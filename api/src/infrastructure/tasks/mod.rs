pub mod install_queue;
