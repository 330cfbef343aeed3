//! Solidity bindings for the `BuyMeACoffee` contract.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    interface IBuyMeACoffee {
        #[derive(Debug, PartialEq, Eq)]
        struct Memo {
            address from;
            string name;
            string message;
            uint256 timestamp;
        }

        #[derive(Debug, PartialEq, Eq)]
        event NewMemo(address indexed from, string name, string message, uint256 timestamp);

        function getMemos() external view returns (Memo[] memory);
        function owner() external view returns (address);
        function buyCoffee(string memory _name, string memory _message) external payable;
        function withdrawTips() external;
    }
}
