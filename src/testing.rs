//! Simulated bus for tests: records what the panel receives and emulates a
//! sequential-mode SPI SRAM on the same bus.

extern crate std;

use core::convert::Infallible;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiBus};

/// Something observable on the bench
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    /// Byte received by the panel with DC low
    Command(u8),
    /// Byte received by the panel with DC high
    Data(u8),
    /// A delay in ms
    Delay(u32),
    /// Level change of the reset line
    Reset(bool),
}

#[derive(Clone, Copy)]
pub(crate) enum Role {
    PanelCs,
    Dc,
    Rst,
    SramCs,
    Busy,
}

#[derive(Clone, Copy)]
enum SramState {
    Idle,
    Address { write: bool, got: u8, addr: u16 },
    Read(u16),
    Write(u16),
    WriteStatus,
    Ignore,
}

struct World {
    panel_selected: bool,
    data_mode: bool,
    sram_selected: bool,
    sram_state: SramState,
    sram: Vec<u8>,
    sram_status: u8,
    busy_for: u32,
    busy_reads: u32,
    events: Vec<Event>,
}

impl World {
    fn exchange(&mut self, out: u8) -> u8 {
        let received = if self.sram_selected {
            self.sram_step(out)
        } else {
            0
        };
        if self.panel_selected {
            self.events.push(if self.data_mode {
                Event::Data(out)
            } else {
                Event::Command(out)
            });
        }
        received
    }

    fn sram_step(&mut self, out: u8) -> u8 {
        let (next, received) = match self.sram_state {
            SramState::Idle => match out {
                0x03 => (
                    SramState::Address {
                        write: false,
                        got: 0,
                        addr: 0,
                    },
                    0,
                ),
                0x02 => (
                    SramState::Address {
                        write: true,
                        got: 0,
                        addr: 0,
                    },
                    0,
                ),
                0x01 => (SramState::WriteStatus, 0),
                _ => (SramState::Ignore, 0),
            },
            SramState::Address { write, got, addr } => {
                let addr = addr << 8 | out as u16;
                let next = match (got + 1, write) {
                    (2, false) => SramState::Read(addr),
                    (2, true) => SramState::Write(addr),
                    (got, _) => SramState::Address { write, got, addr },
                };
                (next, 0)
            }
            SramState::Read(addr) => (
                SramState::Read(addr.wrapping_add(1)),
                self.sram[addr as usize],
            ),
            SramState::Write(addr) => {
                self.sram[addr as usize] = out;
                (SramState::Write(addr.wrapping_add(1)), 0)
            }
            SramState::WriteStatus => {
                self.sram_status = out;
                (SramState::Ignore, 0)
            }
            SramState::Ignore => (SramState::Ignore, 0),
        };
        self.sram_state = next;
        received
    }
}

/// Owner of the simulated world, hands out bus, delay and pins
pub(crate) struct Bench {
    world: Rc<RefCell<World>>,
    pub spi: SimSpi,
    pub delay: SimDelay,
}

impl Bench {
    pub fn new() -> Self {
        let world = Rc::new(RefCell::new(World {
            panel_selected: false,
            data_mode: false,
            sram_selected: false,
            sram_state: SramState::Idle,
            sram: vec![0; 0x1_0000],
            sram_status: 0,
            busy_for: 0,
            busy_reads: 0,
            events: Vec::new(),
        }));
        Bench {
            spi: SimSpi {
                world: world.clone(),
            },
            delay: SimDelay {
                world: world.clone(),
            },
            world,
        }
    }

    /// Another handle on the simulated bus, for wrapping it
    pub fn spi_handle(&self) -> SimSpi {
        SimSpi {
            world: self.world.clone(),
        }
    }

    pub fn pin(&self, role: Role) -> SimPin {
        SimPin {
            world: self.world.clone(),
            role,
        }
    }

    /// The busy line reads low for the next `reads` samples
    pub fn hold_busy(&self, reads: u32) {
        self.world.borrow_mut().busy_for = reads;
    }

    pub fn busy_reads(&self) -> u32 {
        self.world.borrow().busy_reads
    }

    /// Selects the panel in data mode without going through a driver
    pub fn select_panel_for_data(&self) {
        let mut world = self.world.borrow_mut();
        world.panel_selected = true;
        world.data_mode = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.world.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.world.borrow_mut().events.clear();
    }

    /// Every byte the panel received, commands and data alike
    pub fn panel_bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Command(b) | Event::Data(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Opcodes in the order the panel received them
    pub fn commands(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Command(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Data bytes following each occurrence of `opcode`
    pub fn data_after(&self, opcode: u8) -> Vec<Vec<u8>> {
        let mut blocks = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        for event in self.events() {
            match event {
                Event::Command(b) => {
                    blocks.extend(current.take());
                    if b == opcode {
                        current = Some(Vec::new());
                    }
                }
                Event::Data(b) => {
                    if let Some(block) = current.as_mut() {
                        block.push(b);
                    }
                }
                _ => {}
            }
        }
        blocks.extend(current);
        blocks
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    pub fn sram(&self) -> Vec<u8> {
        self.world.borrow().sram.clone()
    }

    pub fn sram_mut(&self) -> RefMut<'_, Vec<u8>> {
        RefMut::map(self.world.borrow_mut(), |world| &mut world.sram)
    }

    pub fn sram_status(&self) -> u8 {
        self.world.borrow().sram_status
    }

    pub fn panel_selected(&self) -> bool {
        self.world.borrow().panel_selected
    }

    pub fn sram_selected(&self) -> bool {
        self.world.borrow().sram_selected
    }
}

pub(crate) struct SimSpi {
    world: Rc<RefCell<World>>,
}

impl SpiErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiBus for SimSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut world = self.world.borrow_mut();
        for word in words {
            *word = world.exchange(0);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut world = self.world.borrow_mut();
        for &word in words {
            world.exchange(word);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let mut world = self.world.borrow_mut();
        for i in 0..read.len().max(write.len()) {
            let received = world.exchange(write.get(i).copied().unwrap_or(0));
            if let Some(word) = read.get_mut(i) {
                *word = received;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut world = self.world.borrow_mut();
        for word in words {
            *word = world.exchange(*word);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) struct SimDelay {
    world: Rc<RefCell<World>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.world.borrow_mut().events.push(Event::Delay(ms));
    }
}

pub(crate) struct SimPin {
    world: Rc<RefCell<World>>,
    role: Role,
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl SimPin {
    fn set(&mut self, high: bool) {
        let mut world = self.world.borrow_mut();
        match self.role {
            Role::PanelCs => world.panel_selected = !high,
            Role::Dc => world.data_mode = high,
            Role::Rst => world.events.push(Event::Reset(high)),
            Role::SramCs => {
                world.sram_selected = !high;
                world.sram_state = SramState::Idle;
            }
            Role::Busy => {}
        }
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut world = self.world.borrow_mut();
        world.busy_reads += 1;
        if world.busy_for > 0 {
            world.busy_for -= 1;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
