pub mod fixtures;

pub use fixtures::{
    Collector, TIMEOUT, closed_tcp_address, read_exact, tcp_collector, udp_collector,
};
