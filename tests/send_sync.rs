//! Send/Sync guarantees for core types.

use femtosyslog::{
    DeliveryStats, Event, FemtoSyslogClient, RateLimitedWarner, SyslogClientBuilder, SyslogConfig,
    SyslogError, SyslogFormatter, transport::ConnectionManager,
};
use rstest::rstest;
use static_assertions::assert_impl_all;

#[rstest]
fn builders_are_send_sync() {
    assert_impl_all!(SyslogClientBuilder: Send, Sync);
    assert_impl_all!(SyslogConfig: Send, Sync);
}

#[rstest]
fn components_are_send_sync() {
    assert_impl_all!(FemtoSyslogClient: Send, Sync);
    assert_impl_all!(ConnectionManager: Send, Sync);
    assert_impl_all!(SyslogFormatter: Send, Sync);
    assert_impl_all!(RateLimitedWarner: Send, Sync);
    assert_impl_all!(DeliveryStats: Send, Sync);
    assert_impl_all!(Event: Send, Sync);
    assert_impl_all!(SyslogError: Send, Sync);
}
