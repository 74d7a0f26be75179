//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements      | Connects to                        |
//! |---------------|-----------------|------------------------------------|
//! | `hardware`    | DeviceRegistry  | `iio` + `hwmon` + `power` bundled  |
//! |               | FanPort         |                                    |
//! |               | PowerPort       |                                    |
//! | `iio`         | DeviceRegistry  | /sys/bus/iio, debugfs iio          |
//! | `hwmon`       | FanPort         | /sys/class/hwmon                   |
//! | `power`       | PowerPort       | sync(2) + reboot(2)                |
//! | `timer`       | WaitPort        | async-io-mini reactor timer        |
//! | `log_sink`    | EventSink       | `log` facade                       |
//! | `config_file` | ConfigPort      | JSON file                          |
//! | `logger`      | log::Log        | syslog(3)                          |
//! | `signals`     | StopSignal      | SIGINT / SIGTERM via sigwait       |

pub mod config_file;
pub mod hardware;
pub mod hwmon;
pub mod iio;
pub mod log_sink;
pub mod logger;
pub mod power;
pub mod signals;
pub mod timer;
pub(crate) mod utils;
