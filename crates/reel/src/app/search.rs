use super::App;

impl App {
    pub fn start_search(&mut self) {
        self.search_active = true;
        self.search_query.clear();
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search_query.push(ch);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
    }

    /// Jump to the card matching the query (a year or a card id)
    pub fn submit_search(&mut self) {
        let query = std::mem::take(&mut self.search_query);
        self.search_active = false;
        match self.deck.lookup(&query) {
            Some(idx) => self.jump_to_card(idx),
            None => {
                if !query.trim().is_empty() {
                    self.set_hint(format!("No card for \"{}\"", query.trim()));
                }
            }
        }
    }
}
