//! Prompt assembly for the two LLM collaborators.
//!
//! The intent prompt is rebuilt per turn from the authenticated state so the
//! model always sees the ids it is allowed to emit. The narrator prompt
//! summarizes the post-transition state and never includes undiscovered clue
//! text, so the model cannot leak what the player has not found.

use lockroom_domain::GameState;

/// System prompt for the narrator.
pub const NARRATOR_SYSTEM_PROMPT: &str = "You are a brilliant novelist and the game master of an escape room game. \
    Based on the given game state and the player's action, describe what happens next vividly and immersively. \
    Explain the result of the player's action and hint at what could be explored further. \
    Always answer in English, in two to three short sentences of plain prose.\n\
    \n\
    Rules:\n\
    - Never describe a clue that has not been discovered yet.\n\
    - Never use JSON, code, or lists. Write narrative prose only.\n\
    - Do not address the player directly; describe the scene from a third person point of view.";

/// Build the system prompt for intent recognition from the current state.
///
/// Lists every item id with its display name, aliases and concept so the
/// model maps free-form references onto real ids.
pub fn intent_system_prompt(state: &GameState) -> String {
    let item_lines: String = state
        .items
        .values()
        .map(|item| {
            let mut line = format!("- {}: {}", item.id.as_str(), item.name);
            if !item.aliases.is_empty() {
                line.push_str(&format!(" (aliases: {})", item.aliases.join(", ")));
            }
            if let Some(concept) = &item.concept {
                line.push_str(&format!(", {concept}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    let abilities = if state.player.abilities.is_empty() {
        "none".to_string()
    } else {
        state.player.abilities.join(", ")
    };

    format!(
        "You are the intent analysis AI of a text adventure game. Analyze the player's input and convert it into a fixed JSON format.\n\
        The input may arrive in any language.\n\
        \n\
        JSON format to return:\n\
        {{ \"action\": \"ACTION_TYPE\", \"object\": \"OBJECT_ID\", \"secondaryObject\": \"OBJECT_ID\" (optional) }}\n\
        \n\
        ACTION_TYPE values:\n\
        - \"look\": look at or examine something (e.g. \"look around\", \"examine the desk\")\n\
        - \"take\": pick something up (e.g. \"take the key\", \"get the memo\")\n\
        - \"open\": open something (e.g. \"open the drawer\")\n\
        - \"unlock\": unlock with a tool, or enter a code (e.g. \"unlock the drawer with the key\", \"enter 4128\")\n\
        - \"inventory\": list what the player is carrying (e.g. \"what am I holding?\")\n\
        - \"hint\": ask for a hint\n\
        \n\
        OBJECT_ID must be an item id from the list below, or \"room\", or the digits of a code.\n\
        Items in the room:\n\
        {item_lines}\n\
        \n\
        If the player looks at the room or their surroundings, set object to \"room\".\n\
        If the input contains a four-digit number, treat it as a code entry: action \"unlock\", object set to the digits.\n\
        If the player uses one item on another, set action to \"unlock\", object to the tool's id and secondaryObject to the target's id.\n\
        \n\
        The player's abilities: {abilities}.\n\
        \n\
        Examples:\n\
        - \"what's on the desk?\" -> {{ \"action\": \"look\", \"object\": \"desk\" }}\n\
        - \"take the small key\" -> {{ \"action\": \"take\", \"object\": \"key\" }}\n\
        - \"open the locked drawer with the key\" -> {{ \"action\": \"unlock\", \"object\": \"key\", \"secondaryObject\": \"drawer\" }}\n\
        - \"the code is 0451\" -> {{ \"action\": \"unlock\", \"object\": \"0451\" }}"
    )
}

/// Build the narrator's user prompt from the post-transition state.
pub fn narrator_user_prompt(state: &GameState, user_input: &str) -> String {
    let visible: Vec<&str> = state
        .items
        .values()
        .filter(|item| item.is_visible())
        .map(|item| item.name.as_str())
        .collect();
    let visible = if visible.is_empty() {
        "none".to_string()
    } else {
        visible.join(", ")
    };

    let inventory = state.inventory_names();
    let inventory = if inventory.is_empty() {
        "none".to_string()
    } else {
        inventory.join(", ")
    };

    let last_outcome = state.last_message.as_deref().unwrap_or("none");

    format!(
        "# Current game state\n\
        Room: {}\n\
        Visible items: {}\n\
        Carried items: {}\n\
        Result of the last action: {}\n\
        \n\
        # The player's last action\n\
        \"{}\"\n\
        \n\
        # Describe what happens next.",
        state.room_description, visible, inventory, last_outcome, user_input
    )
}
