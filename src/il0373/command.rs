//! SPI Commands for the IL0373 controller

use crate::traits;

/// IL0373 commands
///
/// Only the ones the driver issues. For more infos about the addresses and
/// what they are doing look into the IL0373 datasheet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Set Resolution, LUT selection, BWR pixels, gate scan direction, source shift
    /// direction, booster switch, soft reset.
    PanelSetting = 0x00,

    /// Selecting internal and external power
    PowerSetting = 0x01,

    /// Turns off charge pump, T-con, source and gate drivers, VCOM and the
    /// temperature sensor. Register data is kept.
    PowerOff = 0x02,

    /// Turning On the Power
    ///
    /// Once the power on sequence is complete, the BUSY signal goes high.
    PowerOn = 0x04,

    /// Phase lengths and driving strength of the booster
    BoosterSoftStart = 0x06,

    /// Writes the black/white plane into controller memory
    DataStartTransmission1 = 0x10,

    /// Refreshes the panel from controller memory. BUSY stays low until the
    /// refresh is done.
    DisplayRefresh = 0x12,

    /// Writes the red plane into controller memory
    DataStartTransmission2 = 0x13,

    /// Frame rate
    PllControl = 0x30,

    /// VCOM and data interval setting (CDI), also sets the border color
    VcomAndDataIntervalSetting = 0x50,

    /// Gate and source resolution
    ResolutionSetting = 0x61,

    /// VCOM_DC level
    VcmDcSetting = 0x82,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Command as CommandTrait;

    #[test]
    fn command_addr() {
        assert_eq!(Command::PanelSetting.address(), 0x00);
        assert_eq!(Command::PowerOn.address(), 0x04);
        assert_eq!(Command::DataStartTransmission1.address(), 0x10);
        assert_eq!(Command::DisplayRefresh.address(), 0x12);
        assert_eq!(Command::DataStartTransmission2.address(), 0x13);
        assert_eq!(Command::VcmDcSetting.address(), 0x82);
    }
}
