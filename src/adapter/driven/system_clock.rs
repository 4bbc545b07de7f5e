use crate::domain::port::Clock;
use chrono::{Local, NaiveDateTime};

/// サーバーのローカル時刻を返す時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
