//! Pony personas
//!
//! Every session talks to one pony, picked at random when the session opens.
//! The pony's code name selects its artwork; its display name goes into the
//! system prompt and the greeting.

use rand::seq::SliceRandom;
use rand::Rng;

/// Code names a session can be assigned
pub const PONIES: &[&str] = &[
    "applejack",
    "braeburn",
    "cadance",
    "celestia",
    "cheerilee",
    "derpy",
    "discord",
    "fluttershy",
    "luna",
    "lyra",
    "octavia",
    "pinkie",
    "rainbow",
    "rarity",
    "scootaloo",
    "spike",
    "trixie",
    "twilight",
    "vinyl",
    "zecora",
];

const NAME_PLACEHOLDER: &str = "{name}";

const PROMPT_TEMPLATE: &str = "
You are a pony from My Little Pony. Your name is {name}.
The user would like to have a conversation with you.

## Guidelines:

### Fully assume the personality of your character in My Little Pony.
### Respond in the same language as the user.

### Use a pony-flavored vocabulary.

For example, when you answer in English, you can substitute the following words:

anybody => anypony
anyone => anypony
baby => foal
boy => colt
child => foal
children => foals
dollar => bit
everybody => everypony
everyone => everypony
facepalm => facehoof
feet => hooves
folks => foalks
gentlemen => gentlecolts
girls => fillies
guy => stallion
hair => mane
hands => hooves
hey => hay
high five => hoof five
human => pony
ladies => fillies
man => stallion
manhattan => manehattan
money => bits
nobody => nopony
no one => nopony
people => ponies
person => pony
philadelphia => fillydelphia
somebody => somepony
step => trot
the world => equestria
walk => saunter
woman => mare

In other languages, don't hesitate to invent new substitutions and new words to stay in the pony theme.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    code_name: String,
    name: String,
}

impl Persona {
    pub fn new(code_name: impl Into<String>) -> Self {
        let code_name = code_name.into();
        let name = title_case(&code_name);
        Self { code_name, name }
    }

    /// Pick a pony with the thread-local generator
    pub fn random() -> Self {
        Self::choose(&mut rand::thread_rng())
    }

    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code_name = PONIES.choose(rng).copied().unwrap_or(PONIES[0]);
        Self::new(code_name)
    }

    /// Name used to select the pony artwork
    pub fn code_name(&self) -> &str {
        &self.code_name
    }

    /// Name the pony introduces itself with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> String {
        PROMPT_TEMPLATE.replace(NAME_PLACEHOLDER, &self.name)
    }

    pub fn greeting(&self) -> String {
        format!("Hello! My name is {}!", self.name)
    }
}

/// Uppercase the first letter of every word, lowercase the rest
fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut word_start = true;

    for c in text.chars() {
        if word_start {
            output.extend(c.to_uppercase());
        } else {
            output.extend(c.to_lowercase());
        }
        word_start = !(c.is_alphanumeric() || c == '\'');
    }
    output
}
