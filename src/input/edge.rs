/// Detects the rising edge of a key: reports a press once until the key is
/// released again.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeTrigger {
    was_down: bool,
}

impl EdgeTrigger {
    pub fn update(&mut self, is_down: bool) -> bool {
        let pressed = is_down && !self.was_down;
        self.was_down = is_down;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut trigger = EdgeTrigger::default();

        let fired: Vec<bool> = [false, true, true, true, false, true]
            .into_iter()
            .map(|down| trigger.update(down))
            .collect();

        assert_eq!(fired, vec![false, true, false, false, false, true]);
    }
}
