//! Prompt and display rendering.

/// The command prompt: `>` until a name is registered, `(<name>)>`
/// afterwards.
pub fn cmd_prompt(name: &str) -> String {
    if name.is_empty() {
        ">".to_string()
    } else {
        format!("({name})>")
    }
}

/// Renders a delivered message body. The body passes through
/// unaltered.
pub fn room_line(body: &str) -> String {
    format!(" >> {body}")
}

pub fn print_help() {
    println!("=============================================");
    println!("# commands:                                 #");
    println!("#    r <name> - set display name            #");
    println!("#    e <room> - enter a room                #");
    println!("#    l - leave the current room             #");
    println!("#    s <text> - say something               #");
    println!("#    h - help                               #");
    println!("#    q - quit                               #");
    println!("=============================================");
}
