use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::ListState;

pub struct StatefulList<T> {
    pub state: ListState,
    pub items: Vec<T>,
}

impl<T> StatefulList<T> {
    pub fn with_items(items: Vec<T>) -> StatefulList<T> {
        let mut state = ListState::default();
        // Start with the first item selected
        if !items.is_empty() {
            state.select(Some(0));
        }
        StatefulList { state, items }
    }

    /// Swap in a freshly fetched list, keeping the selection in bounds.
    pub fn replace_items(&mut self, new_items: Vec<T>) {
        self.items = new_items;
        let selected = match self.state.selected() {
            _ if self.items.is_empty() => None,
            Some(i) => Some(i.min(self.items.len() - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    i
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    i
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }
}

/// Centered popup area for the editor dialog.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_clamps_the_selection() {
        let mut list = StatefulList::with_items(vec![1, 2, 3]);
        list.next();
        list.next();
        assert_eq!(list.state.selected(), Some(2));

        list.replace_items(vec![1]);
        assert_eq!(list.state.selected(), Some(0));

        list.replace_items(Vec::new());
        assert_eq!(list.state.selected(), None);

        list.replace_items(vec![4, 5]);
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn movement_stays_in_bounds() {
        let mut list = StatefulList::with_items(vec![1, 2]);
        list.previous();
        assert_eq!(list.state.selected(), Some(0));
        list.next();
        list.next();
        assert_eq!(list.state.selected(), Some(1));

        let mut empty: StatefulList<i32> = StatefulList::with_items(Vec::new());
        empty.next();
        assert_eq!(empty.state.selected(), None);
    }
}
