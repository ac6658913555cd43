//! A CHIP-8 interpreter core. The `Emulator` owns the whole machine: memory, registers,
//! call stack, timers, keypad latch and frame buffer. A host drives it one `cycle` at a
//! time and reads the frame buffer and timers between cycles.

// # Interpreter
// * 4096 (0x1000) bytes of memory
// * the hex font lives at 0x50, programs are loaded at 0x200
// * 16 8-bit registers: V0 - VF
// * VF if used is the carry flag in addition operations, "no borrow" flag in subtraction, in draw
// operation the VF flag is set to denote pixel collision
// * the address register I is 16 bits wide
// the stack is only used to store return addresses when subroutines are called

// # Timers
// * delay timer and sound timer, both decremented once per cycle while nonzero
//  - delay timer is used for events, it can be set and read
//  - sound timer beeps when its value is nonzero

// # Input
// there is a 16 symbol hex keyboard with values 0 - F. There are 3 opcode that deal with handling input
//  - one skips an instruction if a specific key is pressed
//  - one skips an instruction if a specific key is NOT pressed
//  - waits for a key press and stores it in a register once it detects it

// # Graphics
// 64x32 pixels

mod config;
mod error;
mod graphics;
mod keyboard;
mod memory;
mod op;


pub use config::EmulatorConfig;
pub use error::{Error, Result};
pub use graphics::{SpriteEdge, HEIGHT, PIXEL_OFF, PIXEL_ON, WIDTH};
pub use keyboard::{AsKeyboard, Key, NUM_KEYS};
pub use memory::{FONT_START_ADDR, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START_ADDR};
pub use op::Op;

use graphics::{Graphics, NUM_BYTES_IN_FONT_CHAR};
use keyboard::Keyboard;
use memory::Memory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slog::{debug, error, info, o, trace, Logger};
use std::fs;
use std::path::Path;

pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
const FLAG_REGISTER: usize = 0xF;

pub struct Emulator {
    memory: Memory, // 4k of RAM

    stack: [u16; STACK_SIZE], // program stack. CHIP 8 can hold up to 16 return addresses
    sp: usize,                // number of return addresses on the stack

    addr: u16,   // address instruction register, I
    pc: u16,     // program counter
    opcode: u16, // the most recently fetched instruction word

    v: [u8; NUM_REGISTERS], // 16 8-bit registers. VF is used as a flag by several of the ops

    graphics: Graphics, // 64x32 pixel monochrome screen

    delay_timer: u8, // timer that can be set and read
    sound_timer: u8, // timer that beeps whenever it is nonzero

    keyboard: Keyboard, // 16 key hex keyboard input (0-F)

    rng: StdRng,
    seed: Option<u64>,
    sprite_edge: SpriteEdge,

    logger: Logger,
}

impl Emulator {
    /// Create an initialized emulator with the default configuration. Pass None to
    /// discard log output.
    pub fn new(logger: Option<Logger>) -> Self {
        let logger = logger.unwrap_or_else(config::discard_logger);
        Self::with_parts(logger, SpriteEdge::default(), None)
    }

    /// Create an initialized emulator from a configuration, building its logger
    pub fn with_config(config: &EmulatorConfig) -> Result<Self> {
        let logger = config.build_logger()?;
        Ok(Self::with_parts(logger, config.sprite_edge, config.seed))
    }

    /// Create an emulator from `config` and load the game at `path` into it
    pub fn with_game_file<P: AsRef<Path>>(path: P, config: &EmulatorConfig) -> Result<Self> {
        let program = fs::read(path.as_ref())?;
        let mut emulator = Emulator::with_config(config)?;
        emulator.load_program(&program)?;
        Ok(emulator)
    }

    fn with_parts(logger: Logger, sprite_edge: SpriteEdge, seed: Option<u64>) -> Self {
        let logger = logger.new(o!("component" => "chip8"));
        info!(logger, "initializing emulator"; "sprite_edge" => ?sprite_edge, "seed" => ?seed);

        Emulator {
            memory: Memory::new(),
            stack: [0; STACK_SIZE],
            sp: 0,
            addr: 0,
            pc: PROGRAM_START_ADDR as u16,
            opcode: 0,
            v: [0; NUM_REGISTERS],
            graphics: Graphics::new(),
            delay_timer: 0,
            sound_timer: 0,
            keyboard: Keyboard::new(),
            rng: Self::seed_rng(seed),
            seed,
            sprite_edge,
            logger,
        }
    }

    fn seed_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Put the machine back into its freshly initialized state. The loaded program is
    /// discarded, the logger and configuration are kept.
    pub fn reset(&mut self) {
        info!(self.logger, "resetting emulator");

        self.memory = Memory::new();
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.addr = 0;
        self.pc = PROGRAM_START_ADDR as u16;
        self.opcode = 0;
        self.v = [0; NUM_REGISTERS];
        self.graphics.clear();
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keyboard = Keyboard::new();
        self.rng = Self::seed_rng(self.seed);
    }

    /// Copy a ROM image into memory at `PROGRAM_START_ADDR`
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if let Err(e) = self.memory.load_program(program) {
            error!(self.logger, "failed to load program"; "error" => %e);
            return Err(e);
        }

        info!(self.logger, "loaded program"; "bytes" => program.len());
        Ok(())
    }

    /// step forward one tick in the interpreter. Fetch the instruction at the
    /// program counter, decode it, execute it, then decrement the timers.
    /// Returns the op that was executed.
    pub fn cycle(&mut self) -> Result<Op> {
        let op = self.fetch()?;
        trace!(self.logger, "executing"; "pc" => self.pc.wrapping_sub(2), "opcode" => self.opcode, "op" => ?op);

        if let Err(e) = self.execute(op) {
            error!(self.logger, "fault"; "error" => %e);
            return Err(e);
        }

        self.decrement_timers();
        Ok(op)
    }

    /// Read the word at the program counter into `opcode`, advance the program
    /// counter past it, and decode it
    fn fetch(&mut self) -> Result<Op> {
        let word = match self.memory.read_word(self.pc as usize) {
            Some(word) => word,
            None => {
                let e = Error::PcOutOfBounds { pc: self.pc };
                error!(self.logger, "fault"; "error" => %e);
                return Err(e);
            }
        };

        self.opcode = word;
        self.pc += 2;
        Ok(Op::from(word))
    }

    fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Execute a single decoded op against the machine state. The program counter is
    /// expected to already point past the op's instruction word. Operands wider than
    /// the instruction word allows are masked first, see `Op::masked`.
    pub fn execute(&mut self, op: Op) -> Result<()> {
        match op.masked() {
            Op::CallRca(addr) => self.call_rca(addr),
            Op::DispClear => self.disp_clear(),
            Op::Return => self.ret()?,
            Op::Goto(addr) => self.goto(addr),
            Op::GotoSubRtn(addr) => self.goto_sub_rtn(addr)?,
            Op::CondVxEq(x, kk) => self.skip_if(self.v[x as usize] == kk),
            Op::CondVxNe(x, kk) => self.skip_if(self.v[x as usize] != kk),
            Op::CondVxVyEq(x, y) => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            Op::ConstSetVx(x, kk) => self.v[x as usize] = kk,
            Op::ConstAddVx(x, kk) => self.const_add_vx(x, kk),
            Op::AssignVyToVx(x, y) => self.v[x as usize] = self.v[y as usize],
            Op::BitOpOr(x, y) => self.v[x as usize] |= self.v[y as usize],
            Op::BitOpAnd(x, y) => self.v[x as usize] &= self.v[y as usize],
            Op::BitOpXor(x, y) => self.v[x as usize] ^= self.v[y as usize],
            Op::MathVxAddVy(x, y) => self.math_vx_add_vy(x, y),
            Op::MathVxMinusVy(x, y) => self.math_vx_minus_vy(x, y),
            Op::BitOpRtShift(x) => self.bit_op_rt_shift(x),
            Op::MathVyMinusVx(x, y) => self.math_vy_minus_vx(x, y),
            Op::BitOpLftShift(x) => self.bit_op_lft_shift(x),
            Op::CondVxVyNe(x, y) => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            Op::MemSetI(addr) => self.addr = addr,
            Op::GotoPlusV0(addr) => self.goto(addr + u16::from(self.v[0])),
            Op::Rand(x, kk) => self.rand(x, kk),
            Op::DispDraw(x, y, height) => self.disp_draw(x, y, height)?,
            Op::KeyOpEqVx(x) => self.skip_if(self.keyboard.get_key_state(self.v[x as usize].into())),
            Op::KeyOpNeVx(x) => self.skip_if(!self.keyboard.get_key_state(self.v[x as usize].into())),
            Op::DelayGet(x) => self.v[x as usize] = self.delay_timer,
            Op::KeyOpGet(x) => self.key_op_get(x),
            Op::DelaySet(x) => self.delay_timer = self.v[x as usize],
            Op::SoundSet(x) => self.sound_timer = self.v[x as usize],
            Op::MemIPlusEqVx(x) => self.addr = self.addr.wrapping_add(u16::from(self.v[x as usize])),
            Op::MemISetSprite(x) => self.mem_i_set_sprite(x)?,
            Op::Bcd(x) => self.bcd(x)?,
            Op::RegDump(x) => self.reg_dump(x)?,
            Op::RegLoad(x) => self.reg_load(x)?,
            Op::Unknown(word) => {
                debug!(self.logger, "unknown opcode, skipping"; "opcode" => word);
            }
        }

        Ok(())
    }

    /// address of the instruction currently executing
    fn current_pc(&self) -> u16 {
        self.pc.wrapping_sub(2)
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER] = flag as u8;
    }

    fn call_rca(&mut self, addr: u16) {
        debug!(self.logger, "machine code routines are not supported, skipping"; "addr" => addr);
    }

    fn disp_clear(&mut self) {
        self.graphics.clear();
    }

    fn ret(&mut self) -> Result<()> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow {
                pc: self.current_pc(),
                opcode: self.opcode,
            });
        }

        self.sp -= 1;
        self.pc = self.stack[self.sp];
        debug!(self.logger, "return"; "to" => self.pc, "depth" => self.sp);
        Ok(())
    }

    fn goto(&mut self, addr: u16) {
        self.pc = addr;
    }

    fn goto_sub_rtn(&mut self, addr: u16) -> Result<()> {
        if self.sp == STACK_SIZE {
            return Err(Error::StackOverflow {
                pc: self.current_pc(),
                opcode: self.opcode,
            });
        }

        self.stack[self.sp] = self.pc;
        self.sp += 1;
        self.pc = addr;
        debug!(self.logger, "call"; "to" => addr, "depth" => self.sp);
        Ok(())
    }

    fn const_add_vx(&mut self, x: u8, kk: u8) {
        let x = x as usize;
        self.v[x] = self.v[x].wrapping_add(kk);
    }

    fn math_vx_add_vy(&mut self, x: u8, y: u8) {
        let sum = u16::from(self.v[x as usize]) + u16::from(self.v[y as usize]);
        self.v[x as usize] = sum as u8;
        self.set_flag(sum > 0xFF);
    }

    fn math_vx_minus_vy(&mut self, x: u8, y: u8) {
        let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
        self.v[x as usize] = vx.wrapping_sub(vy);
        self.set_flag(vx > vy);
    }

    fn math_vy_minus_vx(&mut self, x: u8, y: u8) {
        let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
        self.v[x as usize] = vy.wrapping_sub(vx);
        self.set_flag(vy > vx);
    }

    fn bit_op_rt_shift(&mut self, x: u8) {
        let vx = self.v[x as usize];
        self.v[x as usize] = vx >> 1;
        self.set_flag(vx & 0x1 == 1);
    }

    fn bit_op_lft_shift(&mut self, x: u8) {
        let vx = self.v[x as usize];
        self.v[x as usize] = vx << 1;
        self.set_flag(vx >> 7 == 1);
    }

    fn rand(&mut self, x: u8, kk: u8) {
        let byte: u8 = self.rng.gen();
        self.v[x as usize] = byte & kk;
    }

    fn disp_draw(&mut self, x: u8, y: u8, height: u8) -> Result<()> {
        let start = self.addr as usize;
        let sprite = match self.memory.slice(start, height as usize) {
            Some(sprite) => sprite,
            None => return Err(self.memory_fault(start)),
        };

        let collision = self.graphics.draw(
            self.v[x as usize],
            self.v[y as usize],
            sprite,
            self.sprite_edge,
        );
        self.set_flag(collision);
        Ok(())
    }

    /// If no key is down, rewind the program counter so this instruction runs again
    /// next cycle
    fn key_op_get(&mut self, x: u8) {
        match self.keyboard.first_pressed() {
            Some(key) => self.v[x as usize] = key,
            None => {
                trace!(self.logger, "waiting for key press"; "register" => x);
                self.pc = self.pc.wrapping_sub(2);
            }
        }
    }

    fn mem_i_set_sprite(&mut self, x: u8) -> Result<()> {
        let digit = self.v[x as usize];
        if digit > 0xF {
            return Err(Error::InvalidDigit {
                digit,
                pc: self.current_pc(),
                opcode: self.opcode,
            });
        }

        self.addr = (FONT_START_ADDR + digit as usize * NUM_BYTES_IN_FONT_CHAR) as u16;
        Ok(())
    }

    /// Store the hundreds, tens and ones digits of Vx at I, I+1 and I+2
    fn bcd(&mut self, x: u8) -> Result<()> {
        let vx = self.v[x as usize];
        let start = self.addr as usize;

        let mem = match self.memory.slice_mut(start, 3) {
            Some(mem) => mem,
            None => return Err(self.memory_fault(start)),
        };
        mem[0] = vx / 100;
        mem[1] = (vx / 10) % 10;
        mem[2] = vx % 10;
        Ok(())
    }

    /// Store V0 through Vx inclusive in memory starting at I
    fn reg_dump(&mut self, x: u8) -> Result<()> {
        let count = x as usize + 1;
        let start = self.addr as usize;

        let mem = match self.memory.slice_mut(start, count) {
            Some(mem) => mem,
            None => return Err(self.memory_fault(start)),
        };
        mem.copy_from_slice(&self.v[..count]);
        Ok(())
    }

    /// Fill V0 through Vx inclusive from memory starting at I
    fn reg_load(&mut self, x: u8) -> Result<()> {
        let count = x as usize + 1;
        let start = self.addr as usize;

        let mem = match self.memory.slice(start, count) {
            Some(mem) => mem,
            None => return Err(self.memory_fault(start)),
        };
        self.v[..count].copy_from_slice(mem);
        Ok(())
    }

    /// fault for an access starting at `start` that runs off the end of memory
    fn memory_fault(&self, start: usize) -> Error {
        Error::MemoryOutOfBounds {
            address: start.max(MEMORY_SIZE),
            pc: self.current_pc(),
            opcode: self.opcode,
        }
    }

    /// Read the host's keyboard and update which keys are up or down
    pub fn handle_key_input(&mut self, keyboard: &impl AsKeyboard) {
        self.keyboard.update_keyboard_with_vec(&keyboard.keys_down());
    }

    /// Overwrite the state of all 16 keys, indexed by key value
    pub fn set_keypad(&mut self, keys: &[bool; NUM_KEYS]) {
        self.keyboard.set_all(keys);
    }

    /// The frame buffer, row-major, `PIXEL_ON` for lit pixels and `PIXEL_OFF` otherwise
    pub fn get_pixels(&self) -> &[u32] {
        self.graphics.pixels()
    }

    pub fn is_pixel_lit(&self, x: usize, y: usize) -> bool {
        self.graphics.is_lit(x, y)
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// The host should play a tone while this is true
    pub fn is_sound_playing(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.addr
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.v
    }

    /// The most recently fetched instruction word
    pub fn opcode(&self) -> u16 {
        self.opcode
    }
}
