use std::io::Read;

use log::{debug, trace};
use nanorand::{BufferedRng, Rng, WyRand};

use crate::{
    config::Config,
    error::{DecodeError, LoadError},
    instruction::Instruction,
};

// memory size
pub const MEM_SIZE: usize = 4096;

// display size, in pixels
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
const DISPLAY_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

// subroutine stack depth
pub const STACK_SIZE: usize = 16;

// start of the sprite data
pub const FONT_START: usize = 0x50;

// height of each built-in sprite
const FONT_HEIGHT: usize = 5;

// built-in sprites
const FONT_DATA: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

// start of the area for user programs
pub const PROGRAM_START: usize = 0x200;

// rom size
pub const MAX_ROM_SIZE: usize = MEM_SIZE - PROGRAM_START;

fn build_rng(seed: Option<u64>) -> BufferedRng<WyRand, 8> {
    match seed {
        Some(seed) => BufferedRng::new(WyRand::new_seed(seed)),
        None => BufferedRng::new(WyRand::new()),
    }
}

/// Ensure `len` bytes starting at `start` are inside memory.
fn check_range(start: usize, len: usize) -> Result<(), DecodeError> {
    if start + len > MEM_SIZE {
        Err(DecodeError::MemoryBounds(start + len - 1))
    } else {
        Ok(())
    }
}

/// The complete state of a chip-8 machine.
///
/// Each instance owns its state exclusively; any number of machines can run
/// side by side.
#[allow(non_snake_case)]
pub struct Emulator {
    // program counter
    PC: u16,

    // full memory
    memory: [u8; MEM_SIZE],

    // data registers: V0 - VF
    V: [u8; 16],

    // address register
    I: u16,

    // subroutine stack and its next free slot
    stack: [u16; STACK_SIZE],
    SP: usize,

    // delay timer
    DT: u8,

    // sound timer
    ST: u8,

    // which keys are pressed
    keys: [bool; 16],

    // one byte per pixel, row-major
    display: [u8; DISPLAY_SIZE],

    // set whenever the display changes
    redraw: bool,

    config: Config,

    // random number generator
    rng: BufferedRng<WyRand, 8>,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Emulator {
    /// Build an initialized machine with no program loaded.
    pub fn new(config: Config) -> Self {
        let mut emu = Emulator {
            PC: PROGRAM_START as u16,
            memory: [0u8; MEM_SIZE],
            V: [0u8; 16],
            I: 0,
            stack: [0u16; STACK_SIZE],
            SP: 0,
            DT: 0,
            ST: 0,
            keys: [false; 16],
            display: [0u8; DISPLAY_SIZE],
            redraw: false,
            config,
            rng: build_rng(config.seed),
        };

        emu.initialize();
        emu
    }

    /// Load a chip-8 rom into a freshly initialized machine.
    pub fn load_rom<T>(rom: T) -> Result<Self, LoadError>
    where
        T: Read,
    {
        Self::load_rom_with(rom, Config::default())
    }

    /// Same as [`Emulator::load_rom`], with explicit interpreter options.
    pub fn load_rom_with<T>(mut rom: T, config: Config) -> Result<Self, LoadError>
    where
        T: Read,
    {
        let mut bytes = Vec::with_capacity(MAX_ROM_SIZE);
        rom.read_to_end(&mut bytes)?;

        let mut emu = Emulator::new(config);
        emu.load_program(&bytes)?;
        Ok(emu)
    }

    /// Reset every register, timer, key, pixel and memory cell, then install
    /// the font and point the program counter at the program start.
    pub fn initialize(&mut self) {
        self.PC = PROGRAM_START as u16;
        self.memory = [0u8; MEM_SIZE];
        self.V = [0u8; 16];
        self.I = 0;
        self.stack = [0u16; STACK_SIZE];
        self.SP = 0;
        self.DT = 0;
        self.ST = 0;
        self.keys = [false; 16];
        self.display = [0u8; DISPLAY_SIZE];
        self.redraw = false;
        self.rng = build_rng(self.config.seed);

        // load the sprite data
        let font_area = &mut self.memory[FONT_START..FONT_START + FONT_DATA.len()];
        font_area.copy_from_slice(&FONT_DATA[..]);

        debug!("machine initialized, {:?}", self.config);
    }

    /// Copy a program into memory at the program start address.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_ROM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_ROM_SIZE,
            });
        }

        self.memory[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        debug!("loaded {} bytes at {:#05X}", program.len(), PROGRAM_START);
        Ok(())
    }

    pub fn set_key(&mut self, key: u8, state: bool) {
        self.keys[(key & 0xF) as usize] = state;
    }

    fn get_pressed_key(&self) -> Option<u8> {
        self.keys.iter().position(|state| *state).map(|i| i as u8)
    }

    /// Decrease both timers by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.DT = self.DT.saturating_sub(1);
        self.ST = self.ST.saturating_sub(1);
    }

    /// Return whether the display changed since the last call, clearing the flag.
    pub fn take_redraw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.V
    }

    pub fn display(&self) -> &[u8] {
        &self.display
    }

    /// Whether the pixel at (x, y) is lit; coordinates outside the display
    /// are never lit.
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.display[x + y * DISPLAY_WIDTH] != 0
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn program_counter(&self) -> u16 {
        self.PC
    }

    pub fn index(&self) -> u16 {
        self.I
    }

    pub fn delay_timer(&self) -> u8 {
        self.DT
    }

    pub fn sound_timer(&self) -> u8 {
        self.ST
    }

    pub fn stack_depth(&self) -> usize {
        self.SP
    }

    /// Read the big-endian instruction word at the program counter.
    pub fn fetch(&self) -> Result<u16, DecodeError> {
        let pc = self.PC as usize;
        check_range(pc, 2)?;
        Ok(u16::from_be_bytes([self.memory[pc], self.memory[pc + 1]]))
    }

    /// Decode a single instruction word and apply it.
    pub fn decode_execute(&mut self, word: u16) -> Result<(), DecodeError> {
        let instruction = Instruction::decode(word)?;
        self.execute(instruction)
    }

    /// Fetch the instruction at the program counter and run it.
    pub fn step(&mut self) -> Result<(), DecodeError> {
        let word = self.fetch()?;
        let instruction = Instruction::decode(word)?;
        trace!("{:#05X}: {:04X}  {}", self.PC, word, instruction);
        self.execute(instruction)
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), DecodeError> {
        let next = self.PC.wrapping_add(2);
        let skip = self.PC.wrapping_add(4);

        // every arm yields the new program counter; failures must return
        // before anything is written
        self.PC = match instruction {
            Instruction::ClearScreen => {
                self.display.fill(0);
                self.redraw = true;
                next
            }
            Instruction::Return => {
                if self.SP == 0 {
                    return Err(DecodeError::StackUnderflow);
                }
                self.SP -= 1;
                let addr = self.stack[self.SP];
                if self.config.resume_after_call {
                    addr.wrapping_add(2)
                } else {
                    addr
                }
            }
            Instruction::Jump(addr) => addr,
            Instruction::Call(addr) => {
                if self.SP == STACK_SIZE {
                    return Err(DecodeError::StackOverflow);
                }
                self.stack[self.SP] = self.PC;
                self.SP += 1;
                addr
            }
            Instruction::SkipEqByte(x, nn) => {
                if self.V[x] == nn {
                    skip
                } else {
                    next
                }
            }
            Instruction::SkipNeByte(x, nn) => {
                if self.V[x] != nn {
                    skip
                } else {
                    next
                }
            }
            Instruction::SkipEqReg(x, y) => {
                if self.V[x] == self.V[y] {
                    skip
                } else {
                    next
                }
            }
            Instruction::LoadByte(x, nn) => {
                self.V[x] = nn;
                next
            }
            // VF is left alone
            Instruction::AddByte(x, nn) => {
                self.V[x] = self.V[x].wrapping_add(nn);
                next
            }
            Instruction::LoadReg(x, y) => {
                self.V[x] = self.V[y];
                next
            }
            Instruction::Or(x, y) => {
                self.V[x] |= self.V[y];
                next
            }
            Instruction::And(x, y) => {
                self.V[x] &= self.V[y];
                next
            }
            Instruction::Xor(x, y) => {
                self.V[x] ^= self.V[y];
                next
            }
            // the flag is always written last, so it wins when X is F
            Instruction::AddReg(x, y) => {
                let (result, carry) = self.V[x].overflowing_add(self.V[y]);
                self.V[x] = result;
                self.V[0xF] = carry as u8;
                next
            }
            Instruction::SubReg(x, y) => {
                let (result, borrow) = self.V[x].overflowing_sub(self.V[y]);
                self.V[x] = result;
                self.V[0xF] = (!borrow) as u8;
                next
            }
            // shifts operate on VX; VY is ignored
            Instruction::ShiftRight(x, _) => {
                let flag = self.V[x] & 1;
                self.V[x] >>= 1;
                self.V[0xF] = flag;
                next
            }
            Instruction::SubNeg(x, y) => {
                let (result, borrow) = self.V[y].overflowing_sub(self.V[x]);
                self.V[x] = result;
                self.V[0xF] = (!borrow) as u8;
                next
            }
            Instruction::ShiftLeft(x, _) => {
                let flag = self.V[x] >> 7;
                self.V[x] <<= 1;
                self.V[0xF] = flag;
                next
            }
            Instruction::SkipNeReg(x, y) => {
                if self.V[x] != self.V[y] {
                    skip
                } else {
                    next
                }
            }
            Instruction::LoadIndex(addr) => {
                self.I = addr;
                next
            }
            Instruction::JumpOffset(addr) => (addr + self.V[0x0] as u16) & 0xFFF,
            Instruction::Random(x, nn) => {
                let mut n = [0u8; 1];
                self.rng.fill(&mut n);
                self.V[x] = n[0] & nn;
                next
            }
            Instruction::Draw(x, y, height) => {
                self.draw_sprite(self.V[x], self.V[y], height)?;
                next
            }
            Instruction::SkipKeyPressed(x) => {
                if self.keys[(self.V[x] & 0xF) as usize] {
                    skip
                } else {
                    next
                }
            }
            Instruction::SkipKeyNotPressed(x) => {
                if !self.keys[(self.V[x] & 0xF) as usize] {
                    skip
                } else {
                    next
                }
            }
            Instruction::LoadDelay(x) => {
                self.V[x] = self.DT;
                next
            }
            // without a pressed key the program counter stays put, so the
            // same instruction runs again on the next cycle
            Instruction::WaitKey(x) => match self.get_pressed_key() {
                Some(key) => {
                    self.V[x] = key;
                    next
                }
                None => self.PC,
            },
            Instruction::SetDelay(x) => {
                self.DT = self.V[x];
                next
            }
            Instruction::SetSound(x) => {
                self.ST = self.V[x];
                next
            }
            Instruction::AddIndex(x) => {
                self.I = (self.I + self.V[x] as u16) & 0xFFF;
                next
            }
            Instruction::LoadFont(x) => {
                let digit = (self.V[x] & 0xF) as usize;
                self.I = (FONT_START + digit * FONT_HEIGHT) as u16;
                next
            }
            Instruction::StoreBcd(x) => {
                let i = self.I as usize;
                check_range(i, 3)?;
                self.memory[i] = self.V[x] / 100;
                self.memory[i + 1] = self.V[x] / 10 % 10;
                self.memory[i + 2] = self.V[x] % 10;
                next
            }
            // I is not modified by the bulk transfers
            Instruction::StoreRegisters(x) => {
                let start = self.I as usize;
                check_range(start, x + 1)?;
                self.memory[start..=start + x].copy_from_slice(&self.V[..=x]);
                next
            }
            Instruction::LoadRegisters(x) => {
                let start = self.I as usize;
                check_range(start, x + 1)?;
                self.V[..=x].copy_from_slice(&self.memory[start..=start + x]);
                next
            }
        };

        Ok(())
    }

    /// XOR an 8 pixel wide sprite read from I into the display, setting VF
    /// when any lit pixel gets cleared.
    fn draw_sprite(&mut self, x: u8, y: u8, height: u8) -> Result<(), DecodeError> {
        let start = self.I as usize;
        let rows = height as usize;
        check_range(start, rows)?;

        let edges = self.config.edges;
        let mut collision = false;

        for (row, bits) in self.memory[start..start + rows].iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }

                let px = x as usize + col;
                let py = y as usize + row;
                if let Some(offset) = edges.locate(px, py, DISPLAY_WIDTH, DISPLAY_HEIGHT) {
                    collision |= self.display[offset] == 1;
                    self.display[offset] ^= 1;
                }
            }
        }

        self.V[0xF] = collision as u8;
        self.redraw = true;
        Ok(())
    }
}
