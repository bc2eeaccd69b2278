use dpe_client::render::{CardContainer, ZoneCard};
use dpe_client::{ChatLog, Notifier};
use std::io::{self, Write};

pub(crate) struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        println!("{message}");
    }
}

pub(crate) struct TerminalChat;

impl ChatLog for TerminalChat {
    fn append_capsule(&self, text: &str) {
        println!("  {text}");
    }

    fn scroll_to_bottom(&self) {
        let _ = io::stdout().flush();
    }
}

/// Card list printed as it is built.
pub(crate) struct TerminalCards<W: Write + Send> {
    out: W,
    shown: usize,
}

impl<W: Write + Send> TerminalCards<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, shown: 0 }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> CardContainer for TerminalCards<W> {
    fn clear(&mut self) {
        self.shown = 0;
    }

    fn append(&mut self, card: ZoneCard) {
        self.shown += 1;
        let out = &mut self.out;
        let _ = writeln!(out, "{}. {}", self.shown, card.title);
        if !card.tags.is_empty() {
            let _ = writeln!(out, "   {}", card.tags);
        }
        if let Some(distance) = &card.distance {
            let _ = writeln!(out, "   {distance}");
        }
    }
}
