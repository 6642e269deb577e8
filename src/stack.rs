use crate::error::StackError;

/// how many return addresses fit on the call stack
pub const CHIP8_STACK_DEPTH: usize = 16;

/// Fixed-capacity LIFO of return addresses with an explicit depth counter.
/// A failed push or pop leaves the stack untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    entries: [u16; CHIP8_STACK_DEPTH],
    depth: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: u16) -> Result<(), StackError> {
        if self.depth == CHIP8_STACK_DEPTH {
            return Err(StackError::Overflow);
        }
        self.entries[self.depth] = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.depth == 0 {
            return Err(StackError::Underflow);
        }
        self.depth -= 1;
        Ok(self.entries[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// the live part of the stack, oldest first
    pub fn as_slice(&self) -> &[u16] {
        &self.entries[..self.depth]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_lifo() -> Result<(), StackError> {
        let mut s = CallStack::new();
        s.push(0x202)?;
        s.push(0x304)?;
        assert_eq!(s.depth(), 2);
        assert_eq!(s.as_slice(), &[0x202, 0x304]);
        assert_eq!(s.pop()?, 0x304);
        assert_eq!(s.pop()?, 0x202);
        assert!(s.is_empty());
        Ok(())
    }

    #[test]
    fn test_overflow_leaves_stack_alone() {
        let mut s = CallStack::new();
        for i in 0..16 {
            assert_eq!(s.push(0x200 + i * 2), Ok(()));
        }
        let before = s.clone();
        assert_eq!(s.push(0xabc), Err(StackError::Overflow));
        assert_eq!(s, before);
        assert_eq!(s.depth(), 16);
    }

    #[test]
    fn test_underflow() {
        let mut s = CallStack::new();
        assert_eq!(s.pop(), Err(StackError::Underflow));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_return_to_zero_is_not_an_error() {
        let mut s = CallStack::new();
        s.push(0).unwrap();
        assert_eq!(s.pop(), Ok(0));
    }

    #[test]
    fn test_clear() {
        let mut s = CallStack::new();
        s.push(0x222).unwrap();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s, CallStack::new());
    }
}
