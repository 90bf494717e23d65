//! Datasheet constants of the IL0373 as used on the flexible tri-color panels
//!
//! The sequences are plain data; [`Il0373`](super::Il0373) walks them. The
//! parameter bytes have to go out exactly as listed.

use super::command::Command;

/// One step of a controller sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Opcode without parameters
    Cmd(Command),
    /// Opcode followed by its parameter block
    CmdData(Command, &'static [u8]),
    /// Resolution setting built from the panel size
    Resolution,
    /// Wait until the controller is no longer busy
    WaitReady,
    /// Fixed pause
    DelayMs(u32),
}

/// Sent once after reset
pub(crate) const INIT_SEQUENCE: &[Step] = &[
    Step::CmdData(Command::PowerSetting, &[0x03, 0x00, 0x2b, 0x2b, 0x09]),
    Step::CmdData(Command::BoosterSoftStart, &[0x17, 0x17, 0x17]),
];

/// Charge pump on, then let it settle
pub(crate) const POWER_ON_SEQUENCE: &[Step] = &[
    Step::Cmd(Command::PowerOn),
    Step::WaitReady,
    Step::DelayMs(200),
];

/// Panel registers, sent after every power on
pub(crate) const CONFIGURE_SEQUENCE: &[Step] = &[
    // KW-R mode, LUT from OTP
    Step::CmdData(Command::PanelSetting, &[0xCF]),
    Step::CmdData(Command::VcomAndDataIntervalSetting, &[0x37]),
    // 50 Hz
    Step::CmdData(Command::PllControl, &[0x29]),
    Step::Resolution,
    Step::CmdData(Command::VcmDcSetting, &[0x0A]),
    Step::DelayMs(20),
];

/// Pause between the two plane transfers
pub(crate) const PLANE_GAP_MS: u32 = 2;

/// Starts the refresh, the driver waits for ready afterwards
pub(crate) const REFRESH_SEQUENCE: &[Step] = &[Step::Cmd(Command::DisplayRefresh)];

/// Floating border and VCOM before switching the power off
pub(crate) const POWER_OFF_SEQUENCE: &[Step] = &[
    Step::CmdData(Command::VcomAndDataIntervalSetting, &[0x17]),
    // VCOM_DC opcode without parameters
    Step::Cmd(Command::VcmDcSetting),
    Step::Cmd(Command::PowerOff),
    Step::DelayMs(2000),
];

/// Pause between the two refresh cycles of a full clear
pub(crate) const CLEAR_GAP_MS: u32 = 100;

/// Reset line hold time
pub(crate) const RESET_HOLD_MS: u32 = 10;

/// Resolution parameter block
///
/// Height only sends its low byte, width goes out high byte first. This is
/// the register layout of the controller revision on these panels.
pub(crate) fn resolution(width: u32, height: u32) -> [u8; 3] {
    [
        (height & 0xFF) as u8,
        ((width >> 8) & 0xFF) as u8,
        (width & 0xFF) as u8,
    ]
}
