/// 35 CHIP 8 op codes, plus `Unknown` for words that match none of them. Decoding
/// yields register operands between 0x0 and 0xF and addresses that fit in 12 bits;
/// `masked` brings a hand-built op into the same ranges.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Op {
    // 0XXX
    // 0NNN 	Call 		Calls RCA 1802 program at address NNN. Not supported, runs as a no-op.
    CallRca(u16),
    // 00E0 	Display 	disp_clear() 	Clears the screen.
    DispClear,
    // 00EE 	Flow 	return; 	Returns from a subroutine.
    Return,

    // 1NNN 	Flow 	goto NNN;
    Goto(u16),

    // 2NNN 	Flow 	*(0xNNN)()
    GotoSubRtn(u16),

    // 3XNN 	Cond 	if(Vx==NN) skip
    CondVxEq(u8, u8),

    // 4XNN 	Cond 	if(Vx!=NN) skip
    CondVxNe(u8, u8),

    // 5XY0 	Cond 	if(Vx==Vy) skip
    CondVxVyEq(u8, u8),

    // 6XNN 	Const 	Vx = NN
    ConstSetVx(u8, u8),

    // 7XNN 	Const 	Vx += NN (carry flag is not changed)
    ConstAddVx(u8, u8),

    // 8XYN
    AssignVyToVx(u8, u8),
    BitOpOr(u8, u8),
    BitOpAnd(u8, u8),
    BitOpXor(u8, u8),
    MathVxAddVy(u8, u8),
    MathVxMinusVy(u8, u8),
    BitOpRtShift(u8),
    MathVyMinusVx(u8, u8),
    BitOpLftShift(u8),

    // 9XY0 	Cond 	if(Vx!=Vy) skip
    CondVxVyNe(u8, u8),

    // ANNN 	MEM 	I = NNN
    MemSetI(u16),

    // BNNN 	Flow 	PC = V0 + NNN
    GotoPlusV0(u16),

    // CXNN 	Rand 	Vx = rand() & NN
    Rand(u8, u8),

    // DXYN 	Disp 	draw(Vx, Vy, N)
    DispDraw(u8, u8, u8),

    // EXXX
    KeyOpEqVx(u8),
    KeyOpNeVx(u8),

    // FXXX
    DelayGet(u8),
    KeyOpGet(u8),
    DelaySet(u8),
    SoundSet(u8),
    MemIPlusEqVx(u8),
    MemISetSprite(u8),
    Bcd(u8),
    RegDump(u8),
    RegLoad(u8),

    /// a word with no matching instruction. Executes as a no-op.
    Unknown(u16),
}

impl Op {
    /// true for the ops that change the frame buffer
    pub fn is_display_op(&self) -> bool {
        match self {
            Op::DispClear | Op::DispDraw(..) => true,
            _ => false,
        }
    }

    /// The same op with register indices and draw height cut to 4 bits and
    /// addresses cut to 12 bits, the widths the instruction word has room for
    pub fn masked(self) -> Op {
        let r = |reg: u8| reg & 0xF;
        let a = |addr: u16| addr & 0x0FFF;

        match self {
            Op::CallRca(addr) => Op::CallRca(a(addr)),
            Op::Goto(addr) => Op::Goto(a(addr)),
            Op::GotoSubRtn(addr) => Op::GotoSubRtn(a(addr)),
            Op::CondVxEq(x, kk) => Op::CondVxEq(r(x), kk),
            Op::CondVxNe(x, kk) => Op::CondVxNe(r(x), kk),
            Op::CondVxVyEq(x, y) => Op::CondVxVyEq(r(x), r(y)),
            Op::ConstSetVx(x, kk) => Op::ConstSetVx(r(x), kk),
            Op::ConstAddVx(x, kk) => Op::ConstAddVx(r(x), kk),
            Op::AssignVyToVx(x, y) => Op::AssignVyToVx(r(x), r(y)),
            Op::BitOpOr(x, y) => Op::BitOpOr(r(x), r(y)),
            Op::BitOpAnd(x, y) => Op::BitOpAnd(r(x), r(y)),
            Op::BitOpXor(x, y) => Op::BitOpXor(r(x), r(y)),
            Op::MathVxAddVy(x, y) => Op::MathVxAddVy(r(x), r(y)),
            Op::MathVxMinusVy(x, y) => Op::MathVxMinusVy(r(x), r(y)),
            Op::BitOpRtShift(x) => Op::BitOpRtShift(r(x)),
            Op::MathVyMinusVx(x, y) => Op::MathVyMinusVx(r(x), r(y)),
            Op::BitOpLftShift(x) => Op::BitOpLftShift(r(x)),
            Op::CondVxVyNe(x, y) => Op::CondVxVyNe(r(x), r(y)),
            Op::MemSetI(addr) => Op::MemSetI(a(addr)),
            Op::GotoPlusV0(addr) => Op::GotoPlusV0(a(addr)),
            Op::Rand(x, kk) => Op::Rand(r(x), kk),
            Op::DispDraw(x, y, height) => Op::DispDraw(r(x), r(y), r(height)),
            Op::KeyOpEqVx(x) => Op::KeyOpEqVx(r(x)),
            Op::KeyOpNeVx(x) => Op::KeyOpNeVx(r(x)),
            Op::DelayGet(x) => Op::DelayGet(r(x)),
            Op::KeyOpGet(x) => Op::KeyOpGet(r(x)),
            Op::DelaySet(x) => Op::DelaySet(r(x)),
            Op::SoundSet(x) => Op::SoundSet(r(x)),
            Op::MemIPlusEqVx(x) => Op::MemIPlusEqVx(r(x)),
            Op::MemISetSprite(x) => Op::MemISetSprite(r(x)),
            Op::Bcd(x) => Op::Bcd(r(x)),
            Op::RegDump(x) => Op::RegDump(r(x)),
            Op::RegLoad(x) => Op::RegLoad(r(x)),
            Op::DispClear | Op::Return | Op::Unknown(_) => self,
        }
    }
}

/// register index X, bits 8-11
pub fn x(word: u16) -> u8 {
    ((word >> 8) & 0xF) as u8
}

/// register index Y, bits 4-7
pub fn y(word: u16) -> u8 {
    ((word >> 4) & 0xF) as u8
}

/// low nibble, bits 0-3
pub fn n(word: u16) -> u8 {
    (word & 0xF) as u8
}

/// immediate byte, bits 0-7
pub fn kk(word: u16) -> u8 {
    (word & 0xFF) as u8
}

/// 12-bit address, bits 0-11
pub fn nnn(word: u16) -> u16 {
    word & 0x0FFF
}

impl From<u16> for Op {
    fn from(item: u16) -> Self {
        let (vx, vy) = (x(item), y(item));

        match item >> 12 {
            0x0 => match item {
                0x00E0 => Op::DispClear,
                0x00EE => Op::Return,
                _ => Op::CallRca(nnn(item)),
            },
            0x1 => Op::Goto(nnn(item)),
            0x2 => Op::GotoSubRtn(nnn(item)),
            0x3 => Op::CondVxEq(vx, kk(item)),
            0x4 => Op::CondVxNe(vx, kk(item)),
            0x5 => Op::CondVxVyEq(vx, vy),
            0x6 => Op::ConstSetVx(vx, kk(item)),
            0x7 => Op::ConstAddVx(vx, kk(item)),
            0x8 => match n(item) {
                0x0 => Op::AssignVyToVx(vx, vy),
                0x1 => Op::BitOpOr(vx, vy),
                0x2 => Op::BitOpAnd(vx, vy),
                0x3 => Op::BitOpXor(vx, vy),
                0x4 => Op::MathVxAddVy(vx, vy),
                0x5 => Op::MathVxMinusVy(vx, vy),
                0x6 => Op::BitOpRtShift(vx),
                0x7 => Op::MathVyMinusVx(vx, vy),
                0xE => Op::BitOpLftShift(vx),
                _ => Op::Unknown(item),
            },
            0x9 => Op::CondVxVyNe(vx, vy),
            0xA => Op::MemSetI(nnn(item)),
            0xB => Op::GotoPlusV0(nnn(item)),
            0xC => Op::Rand(vx, kk(item)),
            0xD => Op::DispDraw(vx, vy, n(item)),
            0xE => match kk(item) {
                0x9E => Op::KeyOpEqVx(vx),
                0xA1 => Op::KeyOpNeVx(vx),
                _ => Op::Unknown(item),
            },
            0xF => match kk(item) {
                0x07 => Op::DelayGet(vx),
                0x0A => Op::KeyOpGet(vx),
                0x15 => Op::DelaySet(vx),
                0x18 => Op::SoundSet(vx),
                0x1E => Op::MemIPlusEqVx(vx),
                0x29 => Op::MemISetSprite(vx),
                0x33 => Op::Bcd(vx),
                0x55 => Op::RegDump(vx),
                0x65 => Op::RegLoad(vx),
                _ => Op::Unknown(item),
            },
            _ => Op::Unknown(item),
        }
    }
}
