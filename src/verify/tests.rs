use std::io;

use proptest::prelude::*;

use super::{Check, VerificationResult, Verifier};
use crate::exchange::LookupFailure;
use crate::exchange::tests::StubResolver;
use crate::probe::{MailProbe, ProbeError, ProbeOutcome, Stage};

type ProbeFn = dyn Fn(&str, &str) -> Result<ProbeOutcome, ProbeError> + Send + Sync;

struct StubProbe {
    on_probe: Box<ProbeFn>,
}

impl StubProbe {
    fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<ProbeOutcome, ProbeError> + Send + Sync + 'static,
    {
        Self {
            on_probe: Box::new(f),
        }
    }

    fn replying(replies: &'static [&'static str]) -> Self {
        Self::new(move |_, _| Ok(owned(replies)))
    }

    fn unreachable() -> Self {
        Self::new(|recipient, _| panic!("probe should not run for {recipient}"))
    }
}

impl MailProbe for StubProbe {
    fn probe(&self, recipient: &str, exchange: &str) -> Result<ProbeOutcome, ProbeError> {
        (self.on_probe)(recipient, exchange)
    }
}

const GREETING: &str = "220 mx.example.com ESMTP ready\r\n";
const EHLO: &str = "250-mx.example.com at your service\r\n250 SMTPUTF8\r\n";
const OK: &str = "250 2.1.0 OK\r\n";
const BYE: &str = "221 2.0.0 closing connection\r\n";
const GMAIL_MISSING: &str = "550-5.1.1 The email account that you tried to reach does not exist. Please try\r\n550 5.1.1 double-checking the recipient's email address.\r\n";
const GMAIL_DISABLED: &str = "550-5.2.1 The email account that you tried to reach is disabled.\r\n550 5.2.1 Learn more.\r\n";

fn owned(replies: &[&str]) -> Vec<String> {
    replies.iter().map(|r| r.to_string()).collect()
}

fn verifier(probe: StubProbe) -> Verifier<StubResolver, StubProbe> {
    Verifier::with_parts(StubResolver::single("mx.example.com"), probe)
}

fn values(result: &VerificationResult) -> Vec<Option<bool>> {
    result.checks().map(|(_, value)| value).collect()
}

fn assert_ordered(result: &VerificationResult) {
    if let Err(violation) = result.check_pipeline_order() {
        panic!("{violation}: {result:?}");
    }
}

#[test]
fn malformed_address_stops_after_format() {
    let result = verifier(StubProbe::unreachable()).verify("not-an-email");
    assert_ordered(&result);
    assert_eq!(result.format(), Some(false));
    assert_eq!(result.first_failure(), Some(Check::Format));
    assert_eq!(result.responses(), None);
    assert_eq!(result.error(), None);
    insta::assert_snapshot!(result.to_string().trim_end(), @r"
    format: false
    domainResolves: unknown
    domainHasExchangeRecord: unknown
    exchangeResolves: unknown
    exchangeAllowedInitialConnection: unknown
    exchangeAllowedMailSession: unknown
    exchangeAcceptedHello: unknown
    exchangeAcceptedMailCommand: unknown
    exchangeAcceptedRecipientCommand: unknown
    mailboxExists: unknown
    mailboxCouldReceive: unknown
    ");
}

#[test]
fn accepted_recipient_confirms_mailbox() {
    let probe = StubProbe::new(|recipient, exchange| {
        assert_eq!(recipient, "someone@example.com");
        assert_eq!(exchange, "mx.example.com");
        Ok(owned(&[GREETING, EHLO, OK, OK, BYE]))
    });
    let result = verifier(probe).verify("  someone@example.com ");
    assert_ordered(&result);
    assert_eq!(values(&result), vec![Some(true); 11]);
    assert!(result.is_deliverable());
    assert_eq!(result.responses().map(<[String]>::len), Some(5));
    assert_eq!(result.error(), None);
}

#[test]
fn domain_without_exchange_record() {
    let resolver = StubResolver::failing(LookupFailure::NoData);
    let result =
        Verifier::with_parts(resolver, StubProbe::unreachable()).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.domain_resolves(), Some(true));
    assert_eq!(result.domain_has_exchange_record(), Some(false));
    assert_eq!(result.exchange_resolves(), None);
    assert!(result.error().is_some());
}

#[test]
fn unknown_domain_does_not_resolve() {
    let resolver = StubResolver::failing(LookupFailure::NotFound);
    let result =
        Verifier::with_parts(resolver, StubProbe::unreachable()).verify("someone@nowhere.invalid");
    assert_ordered(&result);
    assert_eq!(result.domain_resolves(), Some(false));
    assert_eq!(result.domain_has_exchange_record(), None);
    assert_eq!(result.first_failure(), Some(Check::DomainResolves));
}

#[test]
fn other_lookup_failure_blames_missing_record() {
    let resolver = StubResolver::failing(LookupFailure::Other("request timed out".into()));
    let result =
        Verifier::with_parts(resolver, StubProbe::unreachable()).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.domain_resolves(), Some(true));
    assert_eq!(result.domain_has_exchange_record(), Some(false));
    assert!(result.error().is_some_and(|e| e.contains("request timed out")));
}

#[test]
fn known_missing_mailbox() {
    static REPLIES: [&str; 5] = [GREETING, EHLO, OK, GMAIL_MISSING, BYE];
    let result = verifier(StubProbe::replying(&REPLIES)).verify("gone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_accepted_mail_command(), Some(true));
    assert_eq!(result.exchange_accepted_recipient_command(), Some(false));
    assert_eq!(result.mailbox_exists(), Some(false));
    assert_eq!(result.mailbox_could_receive(), Some(false));
    assert!(!result.is_deliverable());
}

#[test]
fn disabled_mailbox_exists_but_cannot_receive() {
    static REPLIES: [&str; 5] = [GREETING, EHLO, OK, GMAIL_DISABLED, BYE];
    let result = verifier(StubProbe::replying(&REPLIES)).verify("old@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_accepted_recipient_command(), Some(false));
    assert_eq!(result.mailbox_exists(), Some(true));
    assert_eq!(result.mailbox_could_receive(), Some(false));
}

#[test]
fn unrecognised_rejection_leaves_mailbox_unknown() {
    static REPLIES: [&str; 5] = [GREETING, EHLO, OK, "550 no such user here\r\n", BYE];
    let result = verifier(StubProbe::replying(&REPLIES)).verify("who@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_accepted_recipient_command(), Some(false));
    assert_eq!(result.mailbox_exists(), None);
    assert_eq!(result.mailbox_could_receive(), None);
}

#[test]
fn rejected_session_stops_at_mail_session() {
    static REPLIES: [&str; 1] = ["554 Transaction Failed\r\n"];
    let result = verifier(StubProbe::replying(&REPLIES)).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_allowed_initial_connection(), Some(true));
    assert_eq!(result.exchange_allowed_mail_session(), Some(false));
    assert_eq!(result.exchange_accepted_hello(), None);
}

#[test]
fn unexpected_greeting_counts_as_refused_session() {
    static REPLIES: [&str; 1] = ["421 too busy, try later\r\n"];
    let result = verifier(StubProbe::replying(&REPLIES)).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.first_failure(), Some(Check::ExchangeAllowedMailSession));
}

#[test]
fn silent_close_fails_initial_connection() {
    let result = verifier(StubProbe::new(|_, _| Ok(Vec::new()))).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_resolves(), Some(true));
    assert_eq!(result.exchange_allowed_initial_connection(), Some(false));
    assert_eq!(result.responses(), None);
}

#[test]
fn unresolvable_exchange() {
    let probe = StubProbe::new(|_, exchange| {
        Err(ProbeError::Unresolvable {
            host: exchange.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no address"),
        })
    });
    let result = verifier(probe).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_resolves(), Some(false));
    assert_eq!(result.exchange_allowed_initial_connection(), None);
    assert!(result.error().is_some_and(|e| e.contains("mx.example.com")));
}

#[test]
fn refused_connection_fails_initial_connection() {
    let probe = StubProbe::new(|_, exchange| {
        Err(ProbeError::Refused {
            host: exchange.to_string(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        })
    });
    let result = verifier(probe).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_resolves(), Some(true));
    assert_eq!(result.first_failure(), Some(Check::ExchangeAllowedInitialConnection));
    assert_eq!(result.responses(), None);
}

#[test]
fn idle_exchange_keeps_replies_seen_so_far() {
    let probe = StubProbe::new(|_, _| {
        Err(ProbeError::Idle {
            stage: Stage::RcptTo,
            replies: owned(&[GREETING, EHLO, OK]),
        })
    });
    let result = verifier(probe).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_accepted_mail_command(), Some(true));
    assert_eq!(result.exchange_accepted_recipient_command(), Some(false));
    assert_eq!(result.mailbox_exists(), None);
    assert_eq!(result.responses().map(<[String]>::len), Some(3));
    assert_eq!(
        result.error(),
        Some("SMTP connection was idle too long at stage 3 (RCPT TO)")
    );
}

#[test]
fn unanswered_hello_is_reported_through_error() {
    let probe = StubProbe::new(|_, _| {
        Err(ProbeError::Idle {
            stage: Stage::Ehlo,
            replies: owned(&[GREETING]),
        })
    });
    let result = verifier(probe).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.exchange_allowed_mail_session(), Some(true));
    assert_eq!(result.exchange_accepted_hello(), Some(false));
    assert_eq!(
        result.error(),
        Some("SMTP connection was idle too long at stage 1 (EHLO)")
    );
}

#[test]
fn idle_before_greeting() {
    let probe = StubProbe::new(|_, _| {
        Err(ProbeError::Idle {
            stage: Stage::Greeting,
            replies: Vec::new(),
        })
    });
    let result = verifier(probe).verify("someone@example.com");
    assert_ordered(&result);
    assert_eq!(result.first_failure(), Some(Check::ExchangeAllowedInitialConnection));
}

#[test]
fn late_reset_keeps_recipient_verdict() {
    let probe = StubProbe::new(|_, _| {
        Err(ProbeError::Reset {
            stage: Stage::Quit,
            replies: owned(&[GREETING, EHLO, OK, OK]),
            source: io::Error::from(io::ErrorKind::ConnectionReset),
        })
    });
    let result = verifier(probe).verify("someone@example.com");
    assert_ordered(&result);
    assert!(result.is_deliverable());
    assert!(result.error().is_some());
}

#[test]
fn verifier_is_reusable() {
    static REPLIES: [&str; 5] = [GREETING, EHLO, OK, OK, BYE];
    let verifier = verifier(StubProbe::replying(&REPLIES));
    let first = verifier.verify("a@example.com");
    let second = verifier.verify("a@example.com");
    assert_eq!(first, second);
}

#[cfg(feature = "with-serde")]
#[test]
fn json_keys_follow_declared_order() {
    static REPLIES: [&str; 5] = [GREETING, EHLO, OK, OK, BYE];
    let result = verifier(StubProbe::replying(&REPLIES)).verify("a@example.com");
    let json = serde_json::to_string(&result).expect("serialize");
    let mut last = 0;
    for check in Check::ALL {
        let key = format!("\"{check}\":");
        let at = json.find(&key).expect("key present");
        assert!(at >= last, "{check} out of order in {json}");
        last = at;
    }
    assert!(json.find("\"responses\":").expect("responses") > last);
}

#[derive(Debug, Clone, Copy)]
enum Ending {
    Done,
    Unresolvable,
    Refused,
    Reset(Stage),
    Idle(Stage),
    Incomplete(Stage),
}

const POOL: &[&str] = &[
    GREETING,
    EHLO,
    OK,
    BYE,
    GMAIL_MISSING,
    GMAIL_DISABLED,
    "554 Transaction Failed\r\n",
    "421 4.7.0 try again later\r\n",
    "550 5.7.1 relaying denied\r\n",
];

fn stages() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::Greeting),
        Just(Stage::Ehlo),
        Just(Stage::MailFrom),
        Just(Stage::RcptTo),
        Just(Stage::Quit),
    ]
}

fn endings() -> impl Strategy<Value = Ending> {
    prop_oneof![
        Just(Ending::Done),
        Just(Ending::Unresolvable),
        Just(Ending::Refused),
        stages().prop_map(Ending::Reset),
        stages().prop_map(Ending::Idle),
        stages().prop_map(Ending::Incomplete),
    ]
}

fn lookups() -> impl Strategy<Value = Option<LookupFailure>> {
    prop_oneof![
        4 => Just(None),
        1 => Just(Some(LookupFailure::NotFound)),
        1 => Just(Some(LookupFailure::NoData)),
        1 => Just(Some(LookupFailure::Other("no such host".into()))),
        1 => Just(Some(LookupFailure::Other("connection refused".into()))),
    ]
}

fn ending_probe(ending: Ending, replies: Vec<String>) -> StubProbe {
    StubProbe::new(move |_, host| {
        let replies = replies.clone();
        let host = host.to_string();
        match ending {
            Ending::Done => Ok(replies),
            Ending::Unresolvable => Err(ProbeError::Unresolvable {
                host,
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
            Ending::Refused => Err(ProbeError::Refused {
                host,
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            }),
            Ending::Reset(stage) => Err(ProbeError::Reset {
                stage,
                replies,
                source: io::Error::from(io::ErrorKind::ConnectionReset),
            }),
            Ending::Idle(stage) => Err(ProbeError::Idle { stage, replies }),
            Ending::Incomplete(stage) => Err(ProbeError::IncompleteReply {
                stage,
                partial: "250-half".into(),
                replies,
            }),
        }
    })
}

proptest! {
    #[test]
    fn every_outcome_respects_pipeline_order(
        lookup in lookups(),
        ending in endings(),
        replies in prop::collection::vec(prop::sample::select(POOL), 0..=5),
        local in "[a-z]{0,6}",
    ) {
        let resolver = match lookup {
            None => StubResolver::single("mx.example.com"),
            Some(failure) => StubResolver::failing(failure),
        };
        let probe = ending_probe(ending, owned(&replies));
        let result = Verifier::with_parts(resolver, probe).verify(&format!("{local}@example.com"));

        prop_assert_eq!(result.check_pipeline_order(), Ok(()));
        prop_assert_eq!(result.format(), Some(!local.is_empty()));
        if result.is_deliverable() {
            prop_assert_eq!(result.first_failure(), None);
        } else {
            prop_assert!(result.first_failure().is_some());
        }
    }
}
