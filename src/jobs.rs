use libc::pid_t;

pub const MAX_BG_PROCESSES: usize = 100;

/// Bounded LIFO stack of backgrounded process ids. Owned by the top-level
/// loop and handed by reference to the background/foreground strategies;
/// `fore` always recalls the most recently backgrounded process.
#[derive(Debug, Default)]
pub struct JobStack {
    pids: Vec<pid_t>,
}

impl JobStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pid, rejecting above capacity. The stack is left untouched on
    /// overflow.
    pub fn push(&mut self, pid: pid_t) -> Result<(), pid_t> {
        if self.pids.len() >= MAX_BG_PROCESSES {
            return Err(pid);
        }
        self.pids.push(pid);
        Ok(())
    }

    /// Pop the most recently pushed pid, if any.
    pub fn pop(&mut self) -> Option<pid_t> {
        self.pids.pop()
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut stack = JobStack::new();
        for pid in 1..=5 {
            stack.push(pid).unwrap();
        }
        for pid in (1..=5).rev() {
            assert_eq!(stack.pop(), Some(pid));
        }
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn overflow_is_rejected_without_corruption() {
        let mut stack = JobStack::new();
        for pid in 0..MAX_BG_PROCESSES as pid_t {
            stack.push(pid).unwrap();
        }
        assert_eq!(stack.push(9999), Err(9999));
        assert_eq!(stack.len(), MAX_BG_PROCESSES);
        assert_eq!(stack.pop(), Some(MAX_BG_PROCESSES as pid_t - 1));
    }

    #[test]
    fn underflow_reports_empty() {
        let mut stack = JobStack::new();
        assert_eq!(stack.pop(), None);
        stack.push(42).unwrap();
        assert_eq!(stack.pop(), Some(42));
        assert_eq!(stack.pop(), None);
    }
}
