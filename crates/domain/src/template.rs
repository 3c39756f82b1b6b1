use crate::error::DomainError;
use crate::ids::ItemId;
use crate::item::Item;
use crate::state::{GameState, PlayerProfile};

/// One rung of the hint ladder: shown while `clue_item`'s clue is still
/// undiscovered. Rungs are ordered most-blocking first.
#[derive(Debug, Clone)]
pub struct HintRung {
    pub clue_item: ItemId,
    pub message: String,
}

impl HintRung {
    pub fn new(clue_item: impl Into<ItemId>, message: impl Into<String>) -> Self {
        Self {
            clue_item: clue_item.into(),
            message: message.into(),
        }
    }
}

/// Immutable scenario definition.
///
/// Constructed once per process and shared read-only; every session starts
/// from [`WorldTemplate::initial_state`], a structurally independent copy.
/// The catalog's order is the display order for room enumeration, which the
/// state's sorted item map cannot provide on its own.
#[derive(Debug, Clone)]
pub struct WorldTemplate {
    pub catalog: Vec<Item>,
    pub room_description: String,
    pub abilities: Vec<String>,
    /// Code accepted by the terminal lock.
    pub unlock_code: String,
    /// The terminal item the code opens.
    pub code_target: ItemId,
    /// Clues that must be discovered before the code is accepted.
    pub prerequisite_clues: Vec<ItemId>,
    pub win_message: String,
    pub hint_ladder: Vec<HintRung>,
    pub all_hints_message: String,
}

impl WorldTemplate {
    /// Check referential integrity of the scenario data.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = std::collections::BTreeSet::new();
        for item in &self.catalog {
            if !seen.insert(item.id.clone()) {
                return Err(DomainError::validation(format!(
                    "duplicate item id: {}",
                    item.id
                )));
            }
        }
        let exists = |id: &ItemId| seen.contains(id);
        let clue_bearer = |id: &ItemId| {
            self.catalog
                .iter()
                .any(|item| &item.id == id && item.clue.is_some())
        };

        if !exists(&self.code_target) {
            return Err(DomainError::not_found("Item", self.code_target.as_str()));
        }
        for item in &self.catalog {
            if let Some(target) = &item.unlocks {
                if !exists(target) {
                    return Err(DomainError::validation(format!(
                        "{} unlocks unknown item {}",
                        item.id, target
                    )));
                }
            }
            for contained in &item.contains {
                if !exists(contained) {
                    return Err(DomainError::validation(format!(
                        "{} contains unknown item {}",
                        item.id, contained
                    )));
                }
            }
        }
        for id in &self.prerequisite_clues {
            if !clue_bearer(id) {
                return Err(DomainError::validation(format!(
                    "prerequisite clue {} does not name a clue-bearing item",
                    id
                )));
            }
        }
        for rung in &self.hint_ladder {
            if !clue_bearer(&rung.clue_item) {
                return Err(DomainError::validation(format!(
                    "hint rung {} does not name a clue-bearing item",
                    rung.clue_item
                )));
            }
        }
        Ok(())
    }

    /// Produce a fresh session state: a deep, structurally independent copy
    /// of the template's world. Every call allocates anew, so no two
    /// sessions ever share a mutable container.
    pub fn initial_state(&self) -> GameState {
        GameState {
            items: self
                .catalog
                .iter()
                .map(|item| (item.id.clone(), item.clone()))
                .collect(),
            inventory: Vec::new(),
            room_description: self.room_description.clone(),
            last_message: None,
            escaped: false,
            player: PlayerProfile {
                abilities: self.abilities.clone(),
            },
        }
    }

    /// The gallery-curator scenario. A sealed study, six paintings, and a
    /// wall safe wanting the code 4128.
    pub fn curator_study() -> Self {
        Self {
            catalog: vec![
                Item::new(
                    "safe",
                    "Digital Wall Safe",
                    "A digital safe set into the wall, the only way out of here. \
                     A pad with nine digits glows softly, and each press lights one \
                     more digit on the display. It wants a four-digit code.",
                )
                .aliases(["safe", "wall safe", "vault"])
                .concept("a keypad lock opened by entering a code")
                .locked(),
                Item::new(
                    "paintings",
                    "Six Framed Paintings",
                    "Six small paintings hang on the wall in no obvious order. \
                     They show swans, butterflies, cats, a rabbit, puppies, and fish.",
                )
                .aliases(["paintings", "pictures", "frames"])
                .concept("several artworks hanging on the wall")
                .with_clue(
                    "Each frame holds one kind of animal. Counted out: two swans, \
                     eight butterflies, four cats, one rabbit, three puppies, seven fish.",
                ),
                Item::new("desk_memo", "Memo on the Desk", "A handwritten memo lying on the desk.")
                    .aliases(["memo", "note"])
                    .concept("a scrap of paper with writing on it")
                    .takeable()
                    .with_clue(
                        "The memo reads: \"If you ask me... autumn > winter > spring > summer. \
                         I cannot stand the heat!\"",
                    ),
                Item::new(
                    "animal_songs_poem",
                    "Anthology 'Songs of the Animals'",
                    "A slim anthology of poems shelved in the bookcase. \
                     A bookmark pokes out from its pages.",
                )
                .aliases(["anthology", "poems", "poetry book"])
                .concept("a book of poems about animals")
                .with_clue(
                    "The bookmarked page lies open:\n\n\
                     On the warming lake the swans sing their love songs\n\
                     Under the blazing sun the butterflies dance on\n\
                     In the cool of the breeze the cats nap in peace\n\
                     And the rabbit huddles deep in its winter coat",
                ),
                Item::new(
                    "animal_counting_book",
                    "'Counting with Animals' Picture Book",
                    "A children's picture book, 'Counting with Animals', lies open on the shelf.",
                )
                .aliases(["picture book", "counting book", "children's book"])
                .concept("a children's book about counting")
                .with_clue(
                    "The open page says: \"Count the animals in the pictures \
                     and write the numbers down in order!\"",
                ),
                Item::new("desk", "Private Desk", "A tidy desk the curator must have used.")
                    .aliases(["desk"])
                    .concept("furniture for writing and working"),
                Item::new(
                    "bookshelf",
                    "Study Bookcase",
                    "A bookcase packed with art books and poetry collections.",
                )
                .aliases(["bookcase", "shelf"])
                .concept("shelving that holds books"),
            ],
            room_description: "Gallery curator Yerin Kim, found dead 48 hours ago under \
                 unexplained circumstances.\n\n\
                 You are a government agent. Intelligence links the curator to an \
                 international art-smuggling ring, and you have slipped into her private \
                 study to find proof.\n\
                 A shrill alarm sounds and the door seals itself shut.\n\
                 Your earpiece crackles:\n\
                 \"Agent, they are coming. You have fifteen minutes. The evidence is in \
                 the safe. Get it and get out!\"\n\
                 The digital safe on the wall needs a four-digit code."
                .to_string(),
            abilities: vec!["observation".to_string(), "deduction".to_string()],
            unlock_code: "4128".to_string(),
            code_target: ItemId::new("safe"),
            prerequisite_clues: vec![ItemId::new("desk_memo"), ItemId::new("animal_songs_poem")],
            win_message: "The code is right! The safe door swings open, and inside you find \
                 the evidence file and a hidden emergency key. You are out of the study!"
                .to_string(),
            hint_ladder: vec![
                HintRung::new(
                    "paintings",
                    "Hint: the six paintings on the wall stand out. Examining them \
                     closely would be a good place to start.",
                ),
                HintRung::new(
                    "desk_memo",
                    "Hint: there seems to be a rule behind the order of the animals. \
                     The memo on the desk may hold something important.",
                ),
                HintRung::new(
                    "animal_songs_poem",
                    "Hint: the memo gave you the order of the seasons. Now you need to \
                     know which animal stands for which season. Check the anthology in \
                     the bookcase.",
                ),
            ],
            all_hints_message: "Hint: you have found every clue. Take the animal counts \
                 from the paintings and arrange them in the memo's season order to get \
                 the code."
                .to_string(),
        }
    }

    /// The writer's-study scenario: a brass key, a locked drawer hiding a
    /// manuscript page, and a safe wanting the code 0451. Exercises the tool
    /// and container paths the curator scenario never touches.
    pub fn writers_study() -> Self {
        Self {
            catalog: vec![
                Item::new(
                    "safe",
                    "Steel Wall Safe",
                    "A steel wall safe with a worn keypad. Four digits stand between \
                     you and whatever is inside.",
                )
                .aliases(["safe", "wall safe"])
                .concept("a keypad lock opened by entering a code")
                .locked(),
                Item::new(
                    "brass_key",
                    "Brass Key",
                    "A small brass key glints beneath the reading lamp.",
                )
                .aliases(["key", "small key"])
                .concept("a key that fits some lock")
                .takeable()
                .unlocks("drawer"),
                Item::new(
                    "drawer",
                    "Desk Drawer",
                    "The desk has a narrow drawer with a tiny keyhole. It does not budge.",
                )
                .aliases(["desk drawer"])
                .concept("a lockable drawer in the desk")
                .locked()
                .contains(["manuscript_page"]),
                Item::new(
                    "manuscript_page",
                    "Manuscript Page",
                    "A loose manuscript page, creased and ink-stained.",
                )
                .aliases(["page", "manuscript"])
                .concept("a page torn from an unfinished novel")
                .hidden()
                .takeable()
                .with_clue(
                    "A line is circled in red ink: \"She set the combination to the \
                     hour the story began. Four fifty-one, with a zero in front to \
                     round it out.\"",
                ),
                Item::new(
                    "desk",
                    "Oak Desk",
                    "A heavy oak desk strewn with typewritten pages.",
                )
                .aliases(["desk"])
                .concept("furniture for writing and working"),
            ],
            room_description: "The novelist's study is silent except for the tick of a \
                 mantel clock. The door clicked shut behind you and will not move.\n\
                 A steel safe glints beside the bookcase, its keypad waiting for a \
                 four-digit code."
                .to_string(),
            abilities: vec!["observation".to_string(), "deduction".to_string()],
            unlock_code: "0451".to_string(),
            code_target: ItemId::new("safe"),
            prerequisite_clues: vec![ItemId::new("manuscript_page")],
            win_message: "The lock whirs and the safe swings open. Inside lies the \
                 author's final chapter and the key to the study door. You are free."
                .to_string(),
            hint_ladder: vec![HintRung::new(
                "manuscript_page",
                "Hint: the desk drawer is locked, and something small and brass might \
                 fit its keyhole.",
            )],
            all_hints_message: "Hint: the circled line on the manuscript page spells \
                 out the combination."
                .to_string(),
        }
    }
}
