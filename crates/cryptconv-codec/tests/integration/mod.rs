mod hybrid_roundtrip;
