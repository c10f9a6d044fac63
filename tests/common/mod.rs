use assert_cmd::Command;

pub fn chain_cmd() -> Command {
    let mut cmd = Command::cargo_bin("chain").unwrap();
    cmd.env_remove("CHAIN_ROOT");
    cmd.env_remove("CHAIN_LOG");
    cmd.env_remove("EDITOR");
    cmd.env_remove("VISUAL");
    cmd
}
