use std::io::IsTerminal;

/// Whether prompts can be shown. `ACCOUNTS_NO_TTY` forces non-interactive
/// mode and `ACCOUNTS_FORCE_TTY` forces interactive mode.
pub(crate) fn is_interactive() -> bool {
    if std::env::var_os("ACCOUNTS_NO_TTY").is_some() {
        return false;
    }
    std::env::var_os("ACCOUNTS_FORCE_TTY").is_some() || std::io::stdin().is_terminal()
}
