//! Text and JSON renderings of the application state.

use alloy_primitives::{Address, U256, utils::format_ether};
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt::{Display, Write};
use tipjar::{AppState, Memo, SessionStatus, Submission};
use yansi::Paint;

/// Formats wei as ether without trailing zeros, keeping at least one decimal: `0.002`, `0.0`.
pub fn format_balance(wei: U256) -> String {
    let ether = format_ether(wei);
    match ether.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            format!("{int}.{}", if frac.is_empty() { "0" } else { frac })
        }
        None => format!("{ether}.0"),
    }
}

/// The memo's timestamp in `tz`, or the raw number if it is out of range.
pub fn format_timestamp<Tz>(timestamp: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// A single memo: `<name> at <time>`, the message, then the sender.
pub fn memo<Tz>(memo: &Memo, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} at {}\n{}\nFrom: {}",
        memo.name.as_str().bold(),
        format_timestamp(memo.timestamp, tz),
        memo.message,
        memo.from.dim()
    )
}

/// The whole page, with timestamps in local time.
pub fn page(state: &AppState) -> String {
    page_in(state, &Local)
}

pub fn page_in<Tz>(state: &AppState, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Buy Me a Coffee".bold());
    if let Some(owner) = state.view.owner {
        let _ = writeln!(out, "Tips go to: {}", owner.bold());
    }

    let _ = match state.session {
        SessionStatus::Disconnected => writeln!(out, "Wallet: not connected"),
        SessionStatus::Connecting => writeln!(out, "Wallet: connecting..."),
        SessionStatus::Connected { account, .. } => writeln!(out, "Wallet: {account}"),
    };
    if let Some(submission) = state.pending {
        let what = match submission {
            Submission::Tip => "tip",
            Submission::Withdrawal => "withdrawal",
        };
        let _ = writeln!(out, "{}", format!("Waiting for {what} to be mined...").yellow());
    }

    let _ = writeln!(out, "\nMessages:");
    if state.memos.is_empty() {
        let _ = writeln!(out, "No coffees yet!");
    }
    for (i, entry) in state.memos.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", memo(entry, tz));
    }

    if state.is_owner() {
        let _ = writeln!(out, "\nWithdraw Tips (Owner Only): type `withdraw`");
    }
    let _ = write!(out, "\nContract Balance: {} ETH", format_balance(state.view.balance).bold());
    out
}

#[derive(Serialize)]
struct Snapshot<'a> {
    owner: Option<Address>,
    balance: String,
    memos: &'a [Memo],
}

/// `{ owner, balance, memos }` as pretty JSON; the balance is in ether.
pub fn json(state: &AppState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Snapshot {
        owner: state.view.owner,
        balance: format_balance(state.view.balance),
        memos: &state.memos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use chrono::Utc;
    use tipjar::{Action, ChainState};
    use tipjar_config::{SEPOLIA_CHAIN_ID, TIP_AMOUNT};

    const OWNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const TIPPER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn loaded(memos: Vec<Memo>) -> AppState {
        yansi::disable();
        let balance = TIP_AMOUNT * U256::from(memos.len());
        let chain = ChainState { block: 1, memos, owner: OWNER, balance };
        AppState::default().reduce(Action::Loaded(chain))
    }

    fn tip(name: &str, message: &str, timestamp: u64) -> Memo {
        Memo { from: TIPPER, name: name.into(), message: message.into(), timestamp }
    }

    #[test]
    fn balances() {
        assert_eq!(format_balance(U256::ZERO), "0.0");
        assert_eq!(format_balance(TIP_AMOUNT), "0.001");
        assert_eq!(format_balance(U256::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(format_balance(U256::from(3_000_000_000_000_000_000u128)), "3.0");
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(1_700_000_000, &Utc), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(u64::MAX, &Utc), u64::MAX.to_string());
    }

    #[test]
    fn empty_page() {
        let state = loaded(vec![]);
        similar_asserts::assert_eq!(
            page_in(&state, &Utc).as_str(),
            "\
Buy Me a Coffee
Tips go to: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266
Wallet: not connected

Messages:
No coffees yet!

Contract Balance: 0.0 ETH"
        );
    }

    #[test]
    fn page_with_memos() {
        let memos = vec![tip("alice", "gm", 1_700_000_000), tip("bob", "wagmi", 1_700_000_060)];
        let state = loaded(memos)
            .reduce(Action::Connected { account: OWNER, chain_id: SEPOLIA_CHAIN_ID })
            .reduce(Action::Submitted(Submission::Withdrawal));
        similar_asserts::assert_eq!(
            page_in(&state, &Utc).as_str(),
            "\
Buy Me a Coffee
Tips go to: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266
Wallet: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266
Waiting for withdrawal to be mined...

Messages:
alice at 2023-11-14 22:13:20
gm
From: 0x70997970C51812dc3A010C7d01b50e0d17dc79C8

bob at 2023-11-14 22:14:20
wagmi
From: 0x70997970C51812dc3A010C7d01b50e0d17dc79C8

Withdraw Tips (Owner Only): type `withdraw`

Contract Balance: 0.002 ETH"
        );
    }

    #[test]
    fn unknown_owner_is_omitted() {
        yansi::disable();
        let page = page_in(&AppState::default(), &Utc);
        assert!(!page.contains("Tips go to"));
        assert!(page.contains("No coffees yet!"));
    }

    #[test]
    fn json_snapshot() {
        let state = loaded(vec![tip("alice", "gm", 1_700_000_000)]);
        let value: serde_json::Value = serde_json::from_str(&json(&state).unwrap()).unwrap();
        assert_eq!(value["owner"].as_str().unwrap().parse::<Address>().unwrap(), OWNER);
        assert_eq!(value["balance"], "0.001");

        let memos = value["memos"].as_array().unwrap();
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0]["from"].as_str().unwrap().parse::<Address>().unwrap(), TIPPER);
        assert_eq!(memos[0]["name"], "alice");
        assert_eq!(memos[0]["message"], "gm");
        assert_eq!(memos[0]["timestamp"], 1_700_000_000u64);
    }
}
